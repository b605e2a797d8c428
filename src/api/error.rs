//! API error types with JSON `{"error": "..."}` responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::pipeline::{PredictionError, PreprocessError};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
///
/// Server-side variants carry internal detail for the log only; the client
/// sees a fixed message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("No file selected")]
    NoFileSelected,
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),
    #[error("Empty file")]
    EmptyFile,
    #[error("Payload too large")]
    PayloadTooLarge,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    ImageProcessing(String),
    #[error("Model not loaded")]
    ModelNotLoaded,
    #[error("Model error: {0}")]
    ModelFailure(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded
            | ApiError::NoFileSelected
            | ApiError::InvalidFileType(_)
            | ApiError::EmptyFile
            | ApiError::BadRequest(_)
            | ApiError::ImageProcessing(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelNotLoaded | ApiError::ModelFailure(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::NoFileUploaded => "No file uploaded".into(),
            ApiError::NoFileSelected => "No file selected".into(),
            ApiError::InvalidFileType(_) => {
                "Invalid file type. Allowed types: PNG, JPG, JPEG, WebP".into()
            }
            ApiError::EmptyFile => "Empty file".into(),
            ApiError::PayloadTooLarge => "File too large. Maximum size is 5MB".into(),
            ApiError::BadRequest(detail) | ApiError::ImageProcessing(detail) => detail.clone(),
            ApiError::ModelNotLoaded => "Model not loaded".into(),
            ApiError::ModelFailure(_) => "Model prediction failed".into(),
            ApiError::Internal(_) => "An unexpected error occurred".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = ErrorBody {
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ModelNotLoaded => ApiError::ModelNotLoaded,
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::Preprocess(e @ PreprocessError::Decode(_)) => {
                ApiError::ImageProcessing(e.to_string())
            }
            PredictionError::Preprocess(e) => ApiError::Internal(e.to_string()),
            PredictionError::Model(e) => ApiError::ModelFailure(e.to_string()),
            PredictionError::Analysis(e) => ApiError::Internal(e.to_string()),
        }
    }
}
