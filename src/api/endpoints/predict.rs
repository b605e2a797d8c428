//! Prediction endpoint — uploaded photo → infrastructure quality verdict.
//!
//! `POST /predict` takes a multipart form with a single `file` field,
//! validates it, and runs decode → inference → aggregation on the blocking
//! pool. `OPTIONS /predict` answers CORS pre-flight checks.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ImageUpload};
use crate::config::ALLOWED_EXTENSIONS;
use crate::pipeline::{run_prediction, AnalysisResult};

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Whether `file_name` ends in an accepted image extension.
///
/// Matches the text after the last dot, case-insensitively.
pub fn is_allowed_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Pull the first `file` field out of the form and validate it.
///
/// Only `file` parts carrying a `filename` count as uploads. Checks run in
/// order: upload present, filename non-empty, extension allowed, body
/// non-empty.
async fn read_upload(multipart: &mut Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // A part without a filename is a plain form value, not an upload.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(ApiError::NoFileSelected);
        }
        if !is_allowed_file(&file_name) {
            return Err(ApiError::InvalidFileType(file_name));
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.is_empty() {
            return Err(ApiError::EmptyFile);
        }

        return Ok(ImageUpload { file_name, bytes });
    }

    Err(ApiError::NoFileUploaded)
}

/// `POST /predict` — score an uploaded image.
pub async fn predict(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request_id = Uuid::new_v4();

    async move {
        let classifier = ctx.core.classifier()?;

        let mut multipart = multipart.map_err(|e| {
            tracing::debug!(error = %e, "Request is not a multipart upload");
            ApiError::NoFileUploaded
        })?;
        let upload = read_upload(&mut multipart).await?;

        tracing::info!(
            file_name = %upload.file_name,
            size = upload.bytes.len(),
            "Image received"
        );

        let result = tokio::task::spawn_blocking(move || {
            run_prediction(classifier.as_ref(), &upload.bytes)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Prediction task failed: {e}")))??;

        tracing::info!(
            is_good = result.is_good,
            quality_confidence = result.quality_confidence,
            specific_class = result.specific_class,
            "Prediction served"
        );

        Ok::<_, ApiError>(Json(result))
    }
    .instrument(tracing::info_span!("predict", %request_id))
    .await
}

/// `OPTIONS /predict` — CORS pre-flight: no body, explicit allow-list.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type,Accept"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
        ],
    )
}
