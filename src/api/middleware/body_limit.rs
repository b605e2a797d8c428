//! Upload size guard.
//!
//! Rejects any request body larger than [`MAX_UPLOAD_BYTES`] with `413`
//! before a handler runs. A declared `Content-Length` is checked up front;
//! bodies without one are buffered up to the limit and re-attached.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;
use crate::config::MAX_UPLOAD_BYTES;

/// Declared body length, if present and well-formed.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn too_large(size: Option<u64>) -> Response {
    tracing::warn!(size, limit = MAX_UPLOAD_BYTES, "Upload too large");
    ApiError::PayloadTooLarge.into_response()
}

pub async fn reject_oversized(req: Request<Body>, next: Next) -> Response {
    if let Some(len) = declared_length(req.headers()) {
        if len > MAX_UPLOAD_BYTES as u64 {
            return too_large(Some(len));
        }
        return next.run(req).await;
    }

    let (parts, body) = req.into_parts();
    let bytes = match Limited::new(body, MAX_UPLOAD_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => return too_large(None),
        Err(e) => {
            return ApiError::BadRequest(format!("Failed to read request body: {e}"))
                .into_response()
        }
    };
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
