//! Prediction aggregation: four class probabilities → good/bad verdict.
//!
//! Class layout of the model output:
//! - 0, 1: bad infrastructure
//! - 2, 3: good infrastructure

use ndarray::ArrayViewD;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::NUM_CLASSES;

/// Deviation from a unit row sum above which the row is logged as suspect.
const SUM_TOLERANCE: f64 = 1e-3;

#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid prediction format: expected shape (1, {expected}), got {shape:?}", expected = NUM_CLASSES)]
    InvalidShape { shape: Vec<usize> },
}

/// Quality verdict derived from one probability row.
///
/// `bad_probability + good_probability` is ~1.0,
/// `is_good == (good_probability > bad_probability)` and
/// `quality_confidence == max(bad_probability, good_probability)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    #[serde(serialize_with = "bool_as_int")]
    pub is_good: bool,
    pub quality_confidence: f64,
    pub specific_class: usize,
    pub class_confidence: f64,
    #[serde(rename = "bad_infrastructure_prob")]
    pub bad_probability: f64,
    #[serde(rename = "good_infrastructure_prob")]
    pub good_probability: f64,
    #[serde(rename = "individual_probs")]
    pub individual_probabilities: [f64; NUM_CLASSES],
}

fn bool_as_int<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// Aggregate the `(1, 4)` classifier output into an [`AnalysisResult`].
///
/// Only the first row is read. Equal good/bad sums resolve to "bad" and
/// equal class maxima resolve to the lowest index.
pub fn analyze_infrastructure(predictions: ArrayViewD<'_, f32>) -> Result<AnalysisResult, AnalysisError> {
    let shape = predictions.shape();
    if shape.len() != 2 || shape[0] == 0 || shape[1] != NUM_CLASSES {
        return Err(AnalysisError::InvalidShape {
            shape: shape.to_vec(),
        });
    }

    let mut probs = [0.0f64; NUM_CLASSES];
    for (slot, &p) in probs.iter_mut().zip(predictions.iter()) {
        *slot = f64::from(p);
    }

    let bad_probability = probs[0] + probs[1];
    let good_probability = probs[2] + probs[3];

    let total = bad_probability + good_probability;
    if (total - 1.0).abs() > SUM_TOLERANCE {
        tracing::warn!(total, ?probs, "Class probabilities do not sum to 1");
    }

    let specific_class = argmax(&probs);
    let is_good = good_probability > bad_probability;

    Ok(AnalysisResult {
        is_good,
        quality_confidence: good_probability.max(bad_probability),
        specific_class,
        class_confidence: probs[specific_class],
        bad_probability,
        good_probability,
        individual_probabilities: probs,
    })
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
