//! Process-wide application state.
//!
//! Built once at startup and shared read-only (behind `Arc`) with every
//! request handler. The classifier handle is fixed for the life of the
//! process: either a loaded model or `None` when loading failed.

use std::path::Path;
use std::sync::Arc;

use crate::pipeline::classifier::{load_classifier, Classifier};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Model not loaded")]
    ModelNotLoaded,
}

pub struct CoreState {
    classifier: Option<Arc<dyn Classifier>>,
}

impl CoreState {
    /// State around an already-constructed classifier (or none).
    pub fn new(classifier: Option<Arc<dyn Classifier>>) -> Self {
        Self { classifier }
    }

    /// Load the classifier from `model_path`.
    ///
    /// A load failure is logged and leaves the service running without a
    /// model; `/health` and `/predict` then report it.
    pub fn load(model_path: &Path) -> Self {
        match load_classifier(model_path) {
            Ok(classifier) => {
                tracing::info!(
                    backend = classifier.backend(),
                    path = %model_path.display(),
                    "Model loaded successfully"
                );
                Self::new(Some(Arc::from(classifier)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load model at startup");
                Self::new(None)
            }
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Shared handle to the loaded classifier.
    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, CoreError> {
        self.classifier.clone().ok_or(CoreError::ModelNotLoaded)
    }
}
