//! Error types for varasto-db.

use std::path::PathBuf;

use miette::Diagnostic;
use rusqlite::{ffi, ErrorCode};
use thiserror::Error;
use varasto_utils::error::FileSystemError;

/// Database error type for varasto-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(varasto_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(varasto_db::query))]
    QueryError(String),

    #[error("Database migration failed: {0}")]
    #[diagnostic(
        code(varasto_db::migration),
        help("The database schema may be newer than this release, or the file is corrupted")
    )]
    MigrationError(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(varasto_db::not_found))]
    NotFound(String),

    #[error("Value of {table}.{column} is already in use")]
    #[diagnostic(
        code(varasto_db::unique_violation),
        help("Choose a different value for `{column}`")
    )]
    UniqueViolation { table: String, column: String },

    #[error("Database integrity error: {0}")]
    #[diagnostic(
        code(varasto_db::integrity),
        help("A referenced row may not exist")
    )]
    IntegrityError(String),

    #[error("Invalid input: {0}")]
    #[diagnostic(code(varasto_db::validation))]
    Validation(String),

    #[error("Parent of the database path is not a directory: {0}")]
    #[diagnostic(
        code(varasto_db::not_a_directory),
        help("Pick a database path inside an existing directory")
    )]
    NotADirectory(PathBuf),

    #[error("Directory for the database does not exist: {0}")]
    #[diagnostic(
        code(varasto_db::missing_parent),
        help("Create the directory first, or omit the path to use the default location")
    )]
    MissingParent(PathBuf),

    #[error("IO error: {0}")]
    #[diagnostic(
        code(varasto_db::io),
        help("Check file permissions and disk space")
    )]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(
        code(varasto_db::json),
        help("A recorded value could not be encoded for the change log")
    )]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound("Record not found".into()),
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let message = message.unwrap_or_else(|| failure.to_string());
                if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
                    if let Some((table, column)) = parse_unique_target(&message) {
                        return DbError::UniqueViolation { table, column };
                    }
                }
                DbError::IntegrityError(message)
            }
            other => DbError::QueryError(other.to_string()),
        }
    }
}

/// Extracts `table.column` from SQLite's "UNIQUE constraint failed: t.c" message.
///
/// Composite constraints list several columns; only the first is reported.
fn parse_unique_target(message: &str) -> Option<(String, String)> {
    let target = message.split_once(':')?.1.trim();
    let first = target.split(',').next()?.trim();
    let (table, column) = first.split_once('.')?;
    Some((table.to_string(), column.to_string()))
}

/// Result type alias for varasto-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
