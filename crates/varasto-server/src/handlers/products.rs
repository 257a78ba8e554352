//! Product endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use varasto_db::{
    models::ProductForm,
    repository::products::{self, SavedProduct},
    QueryResult, Row,
};

use crate::{error::ApiError, params::ProductListParams, state::AppState};

/// GET /products
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> Result<Json<QueryResult>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter(state.default_limit());
    let result = state
        .with_connection(move |db| products::list(db, &filter))
        .await?;
    Ok(Json(result))
}

/// GET /products/{id}
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Row>, ApiError> {
    let Path(id) = id?;
    let product = state.with_connection(move |db| products::get(db, id)).await?;
    Ok(Json(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    form: Result<Json<ProductForm>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedProduct>), ApiError> {
    let Json(form) = form?;
    let saved = state
        .with_connection(move |db| products::create(db, &form))
        .await?;
    info!("Created product #{}", saved.id);
    if let Some(order_id) = saved.new_order_id {
        info!("Created order #{order_id}");
    }
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    form: Result<Json<ProductForm>, JsonRejection>,
) -> Result<Json<SavedProduct>, ApiError> {
    let Path(id) = id?;
    let Json(form) = form?;
    let saved = state
        .with_connection(move |db| products::update(db, id, &form))
        .await?;
    info!("Updated product #{id}");
    Ok(Json(saved))
}

async fn set_archived(state: AppState, id: i64, archived: bool) -> Result<StatusCode, ApiError> {
    state
        .with_connection(move |db| products::set_archived(db, id, archived))
        .await?;
    info!(
        "{} product #{id}",
        if archived { "Archived" } else { "Unarchived" }
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /products/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    set_archived(state, id, true).await
}

/// POST /products/{id}/unarchive
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
    async fn test_create_get_and_list() {
        let app = TestApp::new(None);

        let (status, body) = app
            .post(
                "/products",
                json!({"description": "Armchair", "code": "12", "state_id": 1, "price": 45.0}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"id": 1, "new_order_id": null}));

        let (status, body) = app.get("/products/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "Armchair");
        assert_eq!(body["code"], "12");

        let (status, body) = app.get("/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["rows"][0]["state"], "In stock");
        assert!(body["rows"][0].get("total").is_none());
    }

    #[tokio::test]
    async fn test_page_size_applies_without_limit() {
        let app = TestApp::new(Some(2));
        for i in 1..=3 {
            app.post(
                "/products",
                json!({"description": format!("Stool {i}"), "state_id": 1}),
            )
            .await;
        }

        let (_, body) = app.get("/products").await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);

        let (_, body) = app.get("/products?limit=-1").await;
        assert_eq!(body["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_advanced_search_empty_selection() {
        let app = TestApp::new(None);
        app.post("/products", json!({"description": "Desk", "state_id": 1}))
            .await;

        let (status, body) = app.get("/products?advanced=true&state=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"total": 0, "rows": []}));

        let (_, body) = app
            .get("/products?advanced=true&state=In%20stock&location=-")
            .await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflict() {
        let app = TestApp::new(None);
        let product = json!({"description": "Lamp", "code": "5", "state_id": 1});
        app.post("/products", product.clone()).await;

        let (status, body) = app.post("/products", product).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["field"], "code");
    }

    #[tokio::test]
    async fn test_validation_and_bad_sort() {
        let app = TestApp::new(None);

        let (status, body) = app
            .post("/products", json!({"description": "", "state_id": 1}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");

        let (status, _) = app.get("/products?sort=price;DROP").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_archive_round_trip() {
        let app = TestApp::new(None);
        app.post("/products", json!({"description": "Rug", "state_id": 1}))
            .await;

        let (status, _) = app.request(Method::POST, "/products/1/archive", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.get("/products").await.1["total"], 0);

        let (status, _) = app
            .request(Method::POST, "/products/1/unarchive", None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.get("/products").await.1["total"], 1);

        let (status, body) = app.request(Method::POST, "/products/9/archive", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_with_new_order() {
        let app = TestApp::new(None);
        app.post("/products", json!({"description": "Bed", "state_id": 1}))
            .await;

        let (status, body) = app
            .request(
                Method::PUT,
                "/products/1",
                Some(json!({"description": "Bed", "state_id": 2, "new_order": true})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_order_id"], 1);

        let (_, order) = app.get("/orders/1").await;
        assert_eq!(order["products"], "Bed");
    }
}
