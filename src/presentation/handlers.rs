// HTTP request handlers
use crate::presentation::app_state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Return the full dashboard document
pub async fn get_dashboards(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.documents.read().await {
        Ok(documents) => (StatusCode::OK, Json(Value::Array(documents))),
        Err(e) => {
            tracing::error!("Error reading dashboards: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read data" })),
            )
        }
    }
}

/// Replace the full dashboard document
pub async fn save_dashboards(
    State(state): State<Arc<AppState>>,
    Json(documents): Json<Vec<Value>>,
) -> impl IntoResponse {
    match state.documents.write(&documents).await {
        Ok(()) => {
            tracing::info!("Saved {} dashboards", documents.len());
            (StatusCode::OK, Json(json!({ "success": true })))
        }
        Err(e) => {
            tracing::error!("Error saving dashboards: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save data" })),
            )
        }
    }
}
