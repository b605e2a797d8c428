//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware stack (outermost → innermost):
//! 1. Response headers (CORS origin + no-cache) → 2. Access log →
//! 3. Upload size guard (declared or buffered length) → 4. Body limit

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::{self, MAX_UPLOAD_BYTES};
use crate::core_state::CoreState;

/// Build the API router.
///
/// JSON endpoints: `/health`, `/predict`, `/test`. Every other path is
/// looked up in the static frontend directory.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core), config::frontend_dir())
}

/// Build the router against a specific frontend directory.
#[cfg(test)]
pub(crate) fn api_router_with_frontend(core: Arc<CoreState>, frontend: PathBuf) -> Router {
    build_router(ApiContext::new(core), frontend)
}

fn build_router(ctx: ApiContext, frontend: PathBuf) -> Router {
    // Layers are applied from bottom (innermost) to top (outermost).
    // Header layers are outermost so 413s and static files get them too.
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/test", get(endpoints::diagnostics::test))
        .route(
            "/predict",
            axum::routing::post(endpoints::predict::predict)
                .options(endpoints::predict::preflight),
        )
        .with_state(ctx)
        .fallback_service(ServeDir::new(frontend))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum::middleware::from_fn(
            middleware::body_limit::reject_oversized,
        ))
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("0"),
        ))
}
