//! Shared API types.

use std::sync::Arc;

use crate::core_state::CoreState;

/// Shared context for all API routes.
/// Cheap to clone; the wrapped `CoreState` is never mutated after startup.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// A validated image upload taken from the `file` multipart field.
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: axum::body::Bytes,
}
