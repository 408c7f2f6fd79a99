use axum::{response::IntoResponse, Json};
use serde_json::json;

pub async fn home() -> impl IntoResponse {
    Json(json!({ "status": "Groq Chef is ready!" }))
}

/// Liveness probe. Does not touch the model or the store.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "pantry-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
