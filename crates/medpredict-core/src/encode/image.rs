//! Chest X-ray image preprocessing.
//!
//! Decodes uploaded image bytes and produces the normalized input tensor
//! the classifier was trained on: 224x224 RGB, values scaled to `[0, 1]`,
//! wrapped in a batch of one.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use image::DynamicImage;

use crate::inference::chest::{INPUT_HEIGHT, INPUT_WIDTH};

/// Upload extensions accepted by the chest X-ray service.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff"];

/// The uploaded bytes could not be decoded as an image.
#[derive(Debug, thiserror::Error)]
#[error("Image preprocessing failed: {0}")]
pub struct PreprocessError(#[from] image::ImageError);

/// Encoder from uploaded image bytes to classifier input tensors.
pub struct XrayEncoder {
    device: Device,
}

impl XrayEncoder {
    /// Creates an encoder producing tensors on the given device.
    #[must_use]
    pub const fn new(device: Device) -> Self {
        Self { device }
    }

    /// Decodes raw upload bytes into an image.
    ///
    /// # Errors
    ///
    /// Returns [`PreprocessError`] if the bytes are not a decodable image.
    /// This is a client error: the upload was unreadable, not a fault of
    /// the service.
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, PreprocessError> {
        Ok(image::load_from_memory(bytes)?)
    }

    /// Encodes a decoded image into the classifier's input tensor.
    ///
    /// The image is stretched to 224x224 (no aspect-ratio preservation),
    /// forced to 3-channel RGB (alpha dropped, grayscale expanded), scaled
    /// from `[0, 255]` to `[0.0, 1.0]`, and laid out channels-first as
    /// `(1, 3, 224, 224)`.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn encode(&self, image: &DynamicImage) -> Result<Tensor> {
        let resized = image.resize_exact(
            INPUT_WIDTH as u32,
            INPUT_HEIGHT as u32,
            image::imageops::FilterType::Triangle,
        );
        let rgb = resized.to_rgb8();

        let data: Vec<f32> = rgb.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();

        // Raw buffer is interleaved HWC; the model wants CHW.
        Tensor::from_vec(data, (INPUT_HEIGHT, INPUT_WIDTH, 3), &self.device)
            .and_then(|t| t.permute((2, 0, 1)))
            .and_then(|t| t.unsqueeze(0))
            .context("Failed to create input tensor")
    }
}

/// Checks an upload's declared file extension against the allow list.
///
/// Matching is case-insensitive; the extension is passed without its dot.
#[must_use]
pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}
