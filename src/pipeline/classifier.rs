use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayD};
use thiserror::Error;

use super::preprocess::NormalizedImage;
use crate::config::NUM_CLASSES;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("Inference backend not compiled in (enable the `onnx` feature)")]
    BackendUnavailable,

    #[error("Model initialization: {0}")]
    Init(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model session lock poisoned")]
    LockPoisoned,
}

/// Pretrained 4-class infrastructure classifier.
///
/// Takes a `(1, 224, 224, 3)` batch and returns the raw `(1, 4)` softmax
/// output. Implementations must tolerate concurrent callers.
pub trait Classifier: Send + Sync {
    fn predict(&self, image: &NormalizedImage) -> Result<ArrayD<f32>, ModelError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Load the classifier artifact at `path`.
///
/// Fails when the file is missing, the ONNX backend is not compiled in,
/// or the runtime rejects the model.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ModelError> {
    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    #[cfg(feature = "onnx")]
    {
        Ok(Box::new(OnnxClassifier::load(path)?))
    }

    #[cfg(not(feature = "onnx"))]
    {
        Err(ModelError::BackendUnavailable)
    }
}

// ═══════════════════════════════════════════════════════════
// ONNX classifier — behind `onnx` feature
// ═══════════════════════════════════════════════════════════

#[cfg(feature = "onnx")]
mod onnx {
    use super::{Classifier, ModelError, NormalizedImage};
    use ndarray::{ArrayD, IxDyn};
    use ort::session::Session;
    use std::path::Path;
    use std::sync::Mutex;

    /// Classifier backed by an ONNX Runtime session.
    ///
    /// `Session::run` needs `&mut self`, so the session sits behind a
    /// `Mutex`: concurrent requests are admitted to the model one at a time.
    pub struct OnnxClassifier {
        session: Mutex<Session>,
    }

    impl OnnxClassifier {
        pub fn load(model_path: &Path) -> Result<Self, ModelError> {
            let session = Session::builder()
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .with_intra_threads(2)
                .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
                .commit_from_file(model_path)
                .map_err(|e: ort::Error| ModelError::Init(format!("ONNX load failed: {e}")))?;

            tracing::info!("ONNX classifier loaded from {}", model_path.display());

            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl Classifier for OnnxClassifier {
        fn predict(&self, image: &NormalizedImage) -> Result<ArrayD<f32>, ModelError> {
            use ort::value::TensorRef;

            let input = TensorRef::from_array_view(image.as_array())
                .map_err(|e| ModelError::Inference(e.to_string()))?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| ModelError::LockPoisoned)?;

            let outputs = session
                .run(ort::inputs![input])
                .map_err(|e| ModelError::Inference(format!("ONNX inference failed: {e}")))?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| ModelError::Inference(format!("Output extraction: {e}")))?;

            let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
            ArrayD::from_shape_vec(IxDyn(&dims), data.to_vec())
                .map_err(|e| ModelError::Inference(format!("Output reshape: {e}")))
        }

        fn backend(&self) -> &'static str {
            "onnx"
        }
    }
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

/// Deterministic classifier for tests and local runs without the model.
///
/// Returns the same probability row for every image, or a fixed
/// inference failure.
pub struct MockClassifier {
    outcome: Result<Vec<f32>, String>,
}

impl MockClassifier {
    /// Always answer with `probabilities` as a `(1, 4)` batch.
    pub fn new(probabilities: [f32; NUM_CLASSES]) -> Self {
        Self {
            outcome: Ok(probabilities.to_vec()),
        }
    }

    /// Answer with an arbitrary row; used to simulate a misshapen model.
    pub fn with_row(row: Vec<f32>) -> Self {
        Self { outcome: Ok(row) }
    }

    /// Fail every call with `ModelError::Inference(reason)`.
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
        }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new([0.25; NUM_CLASSES])
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, image: &NormalizedImage) -> Result<ArrayD<f32>, ModelError> {
        if image.shape().first() != Some(&1) {
            return Err(ModelError::Inference(format!(
                "Expected a batch of one, got shape {:?}",
                image.shape()
            )));
        }
        match &self.outcome {
            Ok(row) => Array2::from_shape_vec((1, row.len()), row.clone())
                .map(|a| a.into_dyn())
                .map_err(|e| ModelError::Inference(e.to_string())),
            Err(reason) => Err(ModelError::Inference(reason.clone())),
        }
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::preprocess_image;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn sample_image() -> NormalizedImage {
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 8));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        preprocess_image(&buf).unwrap()
    }

    #[test]
    fn mock_returns_single_row_of_four() {
        let classifier = MockClassifier::new([0.1, 0.2, 0.3, 0.4]);
        let out = classifier.predict(&sample_image()).unwrap();
        assert_eq!(out.shape(), &[1, 4]);
        assert_eq!(out[[0, 3]], 0.4);
    }

    #[test]
    fn mock_is_deterministic() {
        let classifier = MockClassifier::default();
        let image = sample_image();
        assert_eq!(
            classifier.predict(&image).unwrap(),
            classifier.predict(&image).unwrap()
        );
    }

    #[test]
    fn mock_with_row_keeps_its_width() {
        let classifier = MockClassifier::with_row(vec![0.5, 0.3, 0.2]);
        let out = classifier.predict(&sample_image()).unwrap();
        assert_eq!(out.shape(), &[1, 3]);
    }

    #[test]
    fn failing_mock_reports_inference_error() {
        let classifier = MockClassifier::failing("weights corrupted");
        let err = classifier.predict(&sample_image()).unwrap_err();
        assert!(matches!(err, ModelError::Inference(ref r) if r == "weights corrupted"));
    }

    #[test]
    fn loading_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.onnx");
        match load_classifier(&path) {
            Err(ModelError::NotFound(p)) => assert_eq!(p, path),
            Err(other) => panic!("expected NotFound, got {other}"),
            Ok(_) => panic!("expected NotFound, got a classifier"),
        }
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn loading_without_backend_is_unavailable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            load_classifier(file.path()),
            Err(ModelError::BackendUnavailable)
        ));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn loading_invalid_artifact_fails_init() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not an onnx graph").unwrap();
        assert!(matches!(load_classifier(file.path()), Err(ModelError::Init(_))));
    }
}
