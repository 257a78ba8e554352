//! Route table of the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(product_routes())
        .merge(order_routes())
        .route("/lookups", get(handlers::lookups::list))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get).put(handlers::products::update),
        )
        .route("/products/{id}/archive", post(handlers::products::archive))
        .route(
            "/products/{id}/unarchive",
            post(handlers::products::unarchive),
        )
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders",
            get(handlers::orders::list).post(handlers::orders::create),
        )
        .route(
            "/orders/{id}",
            get(handlers::orders::get).put(handlers::orders::update),
        )
        .route("/orders/{id}/archive", post(handlers::orders::archive))
        .route("/orders/{id}/unarchive", post(handlers::orders::unarchive))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::TestApp;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new(None);
        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")})
        );
    }

    #[tokio::test]
    async fn test_lookups() {
        let app = TestApp::new(None);
        let (status, body) = app.get("/lookups").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["states"][1], json!({"id": 2, "description": "Reserved"}));
        assert_eq!(body["locations"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = TestApp::new(None);
        let (status, _) = app.get("/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
