//! Debug endpoint that never touches the model.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
}

/// `GET /test` — confirms the HTTP layer is up.
pub async fn test() -> Json<TestResponse> {
    tracing::debug!("Test endpoint called");
    Json(TestResponse {
        message: "Test successful",
    })
}
