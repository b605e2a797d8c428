//! Single-image prediction: bytes → tensor → probabilities → verdict.

use std::time::Instant;

use tracing::debug;

use super::analysis::{analyze_infrastructure, AnalysisResult};
use super::classifier::Classifier;
use super::preprocess::preprocess_image;
use super::PredictionError;

/// Score one uploaded image with `classifier`.
///
/// Blocking (decode + inference); call from a blocking context.
pub fn run_prediction(
    classifier: &dyn Classifier,
    bytes: &[u8],
) -> Result<AnalysisResult, PredictionError> {
    let start = Instant::now();

    let image = preprocess_image(bytes)?;
    let predictions = classifier.predict(&image)?;
    let result = analyze_infrastructure(predictions.view())?;

    debug!(
        backend = classifier.backend(),
        is_good = result.is_good,
        specific_class = result.specific_class,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Prediction complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{MockClassifier, ModelError, PreprocessError};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([90, 120, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn scores_image_end_to_end() {
        let classifier = MockClassifier::new([0.1, 0.1, 0.3, 0.5]);
        let result = run_prediction(&classifier, &png_bytes()).unwrap();
        assert!(result.is_good);
        assert_eq!(result.specific_class, 3);
    }

    #[test]
    fn decode_failure_short_circuits() {
        let classifier = MockClassifier::failing("must not be reached");
        let err = run_prediction(&classifier, b"\x00\x01\x02").unwrap_err();
        assert!(matches!(err, PredictionError::Preprocess(PreprocessError::Decode(_))));
    }

    #[test]
    fn model_failure_is_reported() {
        let classifier = MockClassifier::failing("session crashed");
        let err = run_prediction(&classifier, &png_bytes()).unwrap_err();
        assert!(matches!(err, PredictionError::Model(ModelError::Inference(_))));
    }

    #[test]
    fn misshapen_model_output_is_analysis_error() {
        let classifier = MockClassifier::with_row(vec![0.2, 0.2, 0.2, 0.2, 0.2]);
        let err = run_prediction(&classifier, &png_bytes()).unwrap_err();
        assert!(matches!(err, PredictionError::Analysis(_)));
    }
}
