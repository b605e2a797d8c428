//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// `GET /health` — `200` when the classifier is loaded, `500` otherwise.
pub async fn check(State(ctx): State<ApiContext>) -> (StatusCode, Json<HealthResponse>) {
    if ctx.core.is_model_loaded() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                message: "Model loaded successfully",
            }),
        )
    } else {
        tracing::warn!("Health check: model not loaded");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse {
                status: "error",
                message: "Model not loaded",
            }),
        )
    }
}
