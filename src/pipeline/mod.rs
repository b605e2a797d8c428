//! Prediction pipeline: decode → classify → aggregate.
//!
//! Each stage is a pure function of its input with its own error type.
//! `orchestrator` composes them for a single uploaded image.

pub mod analysis;
pub mod classifier;
pub mod orchestrator;
pub mod preprocess;

pub use analysis::{analyze_infrastructure, AnalysisError, AnalysisResult};
pub use classifier::{load_classifier, Classifier, MockClassifier, ModelError};
pub use orchestrator::run_prediction;
pub use preprocess::{preprocess_image, NormalizedImage, PreprocessError};

use thiserror::Error;

/// Failure of any stage while scoring one image.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
