use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use miette::Diagnostic;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use varasto_db::DbError;

/// Errors returned by request handlers.
///
/// Rendered as `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    Conflict { field: String, message: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("Database error")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if let ApiError::DatabaseError(detail) = &self {
            error!("{detail}");
        }

        let mut body = json!({
            "code": code,
            "message": self.to_string(),
        });
        if let ApiError::Conflict { field, .. } = &self {
            body["field"] = json!(field);
        }

        (status, Json(json!({ "error": body }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => ApiError::NotFound(what),
            DbError::UniqueViolation { column, .. } => ApiError::Conflict {
                message: format!("{column} is already in use"),
                field: column,
            },
            DbError::Validation(message) => ApiError::BadRequest(message),
            DbError::IntegrityError(message) => ApiError::BadRequest(message),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Errors that stop the server.
#[derive(Debug, Error, Diagnostic)]
pub enum ServerError {
    #[error("Failed to bind {address}")]
    #[diagnostic(
        code(varasto_server::bind),
        help("Check that the address is valid and the port is not in use")
    )]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(varasto_server::serve))]
    Serve(#[source] std::io::Error),
}
