use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::AppState;

/// Health check endpoint
/// Always 200 while the process is serving; `model_loaded` tells whether
/// predictions can be made.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "model_loaded": state.model_loaded(),
    })))
}

/// Readiness check endpoint
/// Returns 200 only when a model is loaded
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.model_loaded() {
        (StatusCode::OK, Json(json!({
            "status": "ready",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "not_ready",
            "service": env!("CARGO_PKG_NAME"),
            "reason": "model not loaded",
        })))
    }
}
