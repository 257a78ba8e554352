//! Order endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use varasto_db::{models::OrderForm, repository::orders, QueryResult, Row};

use super::Created;
use crate::{error::ApiError, params::OrderListParams, state::AppState};

/// GET /orders
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<OrderListParams>, QueryRejection>,
) -> Result<Json<QueryResult>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter(state.default_limit());
    let result = state
        .with_connection(move |db| orders::list(db, &filter))
        .await?;
    Ok(Json(result))
}

/// GET /orders/{id}
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Row>, ApiError> {
    let Path(id) = id?;
    let order = state.with_connection(move |db| orders::get(db, id)).await?;
    Ok(Json(order))
}

/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    form: Result<Json<OrderForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let Json(form) = form?;
    let id = state
        .with_connection(move |db| orders::create(db, &form))
        .await?;
    info!("Created order #{id}");
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// PUT /orders/{id}
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Json<OrderForm>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(form) = form?;
    state
        .with_connection(move |db| orders::update(db, id, &form))
        .await?;
    info!("Updated order #{id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn set_archived(state: AppState, id: i64, archived: bool) -> Result<StatusCode, ApiError> {
    state
        .with_connection(move |db| orders::set_archived(db, id, archived))
        .await?;
    info!(
        "{} order #{id}",
        if archived { "Archived" } else { "Unarchived" }
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /orders/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    set_archived(state, id, true).await
}

/// POST /orders/{id}/unarchive
pub async fn unarchive(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    set_archived(state, id, false).await
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_utils::TestApp;

    #[tokio::test]
    async fn test_order_lifecycle() {
        let app = TestApp::new(None);

        let (status, body) = app
            .post(
                "/orders",
                json!({"name": "Aino", "phone": "040 1", "delivery_method_id": 2}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1}));

        let (status, _) = app
            .request(
                Method::PUT,
                "/orders/1",
                Some(json!({"name": "Aino V", "reservation_number": 17})),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, order) = app.get("/orders/1").await;
        assert_eq!(order["name"], "Aino V");
        assert_eq!(order["reservation_number"], 17);

        let (_, list) = app.get("/orders?sort=customer&order=asc").await;
        assert_eq!(list["total"], 1);
        assert_eq!(list["rows"][0]["customer"], "Aino V");

        let (status, _) = app.request(Method::POST, "/orders/1/archive", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.get("/orders").await.1["total"], 0);

        let (_, lookups) = app.get("/lookups").await;
        assert_eq!(lookups["open_orders"], json!([]));
    }

    #[tokio::test]
    async fn test_missing_name_and_order() {
        let app = TestApp::new(None);

        let (status, _) = app.post("/orders", json!({"name": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.get("/orders/5").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.get("/orders/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = TestApp::new(None);
        let (status, body) = app
            .request(Method::POST, "/orders", Some(json!(["not", "an", "object"])))
            .await;
        assert!(status.is_client_error());
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}
