//! JSON HTTP API over the inventory database.

pub mod error;
pub mod handlers;
pub mod params;
pub mod routes;
pub mod state;

use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Span};

pub use error::{ApiError, ServerError};
pub use state::AppState;

/// Builds the application router.
pub fn create_app(state: AppState, request_logging: bool) -> Router {
    let router = routes::api_routes().with_state(state);
    if request_logging {
        router.layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<Body>, _: &Span| {
                    info!("{} {}", request.method(), request.uri());
                })
                .on_response(|response: &Response<Body>, latency: Duration, _: &Span| {
                    info!("{} in {latency:?}", response.status());
                }),
        )
    } else {
        router
    }
}

/// Binds `host:port` (port 0 picks a free port) and serves until Ctrl-C.
pub async fn serve(
    state: AppState,
    host: &str,
    port: u16,
    request_logging: bool,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|source| ServerError::Bind {
            address: format!("{host}:{port}"),
            source,
        })?;
    let address: SocketAddr = listener.local_addr().map_err(ServerError::Serve)?;
    info!("Listening on http://{address}");

    axum::serve(listener, create_app(state, request_logging))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down...");
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    pub struct TestApp {
        pub router: Router,
        _dir: TempDir,
    }

    impl TestApp {
        pub fn new(page_size: Option<u32>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let db_file = dir.path().join("test.sqlite3");
            let path = varasto_db::ensure_database(Some(db_file.as_path())).unwrap();
            let state = AppState::new(path, page_size);
            Self {
                router: create_app(state, false),
                _dir: dir,
            }
        }

        pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }

        pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.request(Method::GET, uri, None).await
        }

        pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.request(Method::POST, uri, Some(body)).await
        }
    }
}
