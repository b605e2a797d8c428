//! HTTP boundary.
//!
//! Exposes the prediction pipeline over axum:
//! `GET /health`, `POST|OPTIONS /predict`, `GET /test`, plus static
//! frontend assets for every other `GET`.
//!
//! `api_router()` returns a `Router` that can be mounted on any axum
//! server; `server` owns the listening socket lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, start_server_on, ApiServer, ServerInfo};
pub use types::ApiContext;
