//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Response headers (CORS origin, no-cache) — set in `router`
//! 2. Access log — method, path, status, latency
//! 3. Upload size guard — reject oversized bodies before any handler work

pub mod access_log;
pub mod body_limit;
