// Presentation layer - persistence endpoint routes
pub mod app_state;
pub mod handlers;

pub use app_state::AppState;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::{get_dashboards, health_check, save_dashboards};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboards", get(get_dashboards).post(save_dashboards))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_repository::RepositoryError;
    use crate::application::document_store::DocumentStore;
    use crate::infrastructure::file_store::JsonFileStore;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn read(&self) -> Result<Vec<Value>, RepositoryError> {
            Err(RepositoryError::Unavailable("disk gone".to_string()))
        }

        async fn write(&self, _documents: &[Value]) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("disk gone".to_string()))
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(body: Value) -> Request<Body> {
        Request::post("/api/dashboards")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = build_router(Arc::new(AppState::new(Arc::new(BrokenStore))));
        let response = router
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_then_get_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("dashboards.json")).await.unwrap();
        let router = build_router(Arc::new(AppState::new(Arc::new(store))));

        let doc = json!([{ "id": "d1", "name": "Home", "sections": [] }]);
        let response = router.clone().oneshot(post(doc.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true }));

        let response = router
            .oneshot(Request::get("/api/dashboards").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, doc);
    }

    #[tokio::test]
    async fn test_store_failures_return_500() {
        let router = build_router(Arc::new(AppState::new(Arc::new(BrokenStore))));

        let response = router
            .clone()
            .oneshot(Request::get("/api/dashboards").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to read data");

        let response = router.oneshot(post(json!([]))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to save data");
    }

    #[tokio::test]
    async fn test_non_array_body_is_rejected() {
        let router = build_router(Arc::new(AppState::new(Arc::new(BrokenStore))));
        let response = router.oneshot(post(json!({ "id": "d1" }))).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
