//! Image decoding and normalization for classifier input.
//!
//! Turns an uploaded byte buffer into the `(1, 224, 224, 3)` float tensor
//! the classifier expects:
//! - decode (PNG, JPEG, WebP; format sniffed from the bytes), refusing
//!   images wider or taller than [`MAX_IMAGE_DIMENSION`]
//! - drop any alpha channel, no compositing against a background
//! - stretch to 224x224 without preserving aspect ratio
//! - scale 0..=255 intensities to 0.0..=1.0
//! - prepend a batch axis of size 1

use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageReader, Limits};
use ndarray::Array4;
use thiserror::Error;
use tracing::debug;

use crate::config::{IMAGE_SIZE, MAX_IMAGE_DIMENSION};

/// Number of colour channels fed to the classifier.
pub const CHANNELS: usize = 3;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Error processing image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Tensor construction failed: {0}")]
    Tensor(#[from] ndarray::ShapeError),
}

/// A single image ready for inference, shape `(1, H, W, 3)`, values in `[0, 1]`.
///
/// Read-only once built; the request that created it owns it.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    tensor: Array4<f32>,
}

impl NormalizedImage {
    pub fn as_array(&self) -> &Array4<f32> {
        &self.tensor
    }

    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }
}

/// Decode and normalize an uploaded image.
pub fn preprocess_image(bytes: &[u8]) -> Result<NormalizedImage, PreprocessError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_IMAGE_DIMENSION);
    limits.max_image_height = Some(MAX_IMAGE_DIMENSION);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)?;
    reader.limits(limits);
    let decoded = reader.decode()?;
    debug!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        "Decoded upload"
    );

    // RGBA → RGB keeps the colour channels as-is and discards alpha.
    let rgb = decoded.to_rgb8();
    let resized = image::imageops::resize(&rgb, IMAGE_SIZE, IMAGE_SIZE, FilterType::CatmullRom);

    let side = IMAGE_SIZE as usize;
    let data: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();
    let tensor = Array4::from_shape_vec((1, side, side, CHANNELS), data)?;

    Ok(NormalizedImage { tensor })
}
