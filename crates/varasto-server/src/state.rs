use std::{path::PathBuf, sync::Arc};

use tracing::error;
use varasto_db::DbConnection;

use crate::error::ApiError;

/// Shared per-process state. Holds no connection; each request opens its own.
#[derive(Clone, Debug)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    page_size: Option<u32>,
}

impl AppState {
    /// `db_path` must point at a migrated database.
    pub fn new(db_path: PathBuf, page_size: Option<u32>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            page_size,
        }
    }

    /// Limit for list requests that don't send one.
    pub fn default_limit(&self) -> Option<i64> {
        self.page_size.map(i64::from)
    }

    /// Runs `f` on a blocking thread with a fresh connection.
    ///
    /// The connection is dropped when `f` returns, on success and on error.
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut DbConnection) -> varasto_db::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.db_path);
        let result = tokio::task::spawn_blocking(move || {
            let mut db = DbConnection::open_without_migrations(path.as_path())?;
            f(&mut db)
        })
        .await
        .map_err(|err| {
            error!("Database task failed: {err}");
            ApiError::Internal
        })?;

        Ok(result?)
    }
}
