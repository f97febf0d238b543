//! Chest X-ray classifier for pneumonia detection.
//!
//! A compact CNN over preprocessed X-ray tensors. Takes `(1, 3, 224, 224)`
//! inputs normalized to `[0, 1]` and produces one probability per class
//! via softmax. The head is sized by the label list loaded alongside the
//! weights, so a mis-paired artifact shows up as an output-length mismatch
//! instead of a silent misread.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::{Module, Tensor, D};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};

/// Input width the classifier was trained on.
pub const INPUT_WIDTH: usize = 224;
/// Input height the classifier was trained on.
pub const INPUT_HEIGHT: usize = 224;

/// Chest X-ray classifier model.
///
/// Architecture: 3 conv layers with max pooling, spatial mean pooling,
/// and a linear head of `num_classes` outputs.
pub struct ChestXrayClassifier {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    head: Linear,
    num_classes: usize,
}

impl ChestXrayClassifier {
    /// Creates a classifier from loaded weights.
    ///
    /// `num_classes` must match the label list the model was trained
    /// against; it sizes the linear head.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are missing tensors or have shapes
    /// that do not match this architecture.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder, num_classes: usize) -> Result<Self> {
        // Conv layer 1: 3 -> 16 channels, 3x3 kernel
        let conv1 = conv2d(
            3,
            16,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv1"),
        )?;

        // Conv layer 2: 16 -> 32 channels, 3x3 kernel
        let conv2 = conv2d(
            16,
            32,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv2"),
        )?;

        // Conv layer 3: 32 -> 64 channels, 3x3 kernel
        let conv3 = conv2d(
            32,
            64,
            3,
            Conv2dConfig {
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv3"),
        )?;

        // Spatial mean pooling keeps the head at 64 inputs regardless of
        // the post-pooling feature map size.
        let head = linear(64, num_classes, vb.pp("head"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            head,
            num_classes,
        })
    }

    /// Number of output classes the head produces.
    #[must_use]
    pub const fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Runs inference and returns the flattened probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward pass fails, e.g. on an input of the
    /// wrong shape.
    pub fn predict(&self, input: &Tensor) -> Result<Vec<f32>> {
        let logits = self.forward(input).context("Classifier forward pass failed")?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        probs
            .flatten_all()?
            .to_vec1::<f32>()
            .context("Failed to read probabilities from output tensor")
    }
}

impl Module for ChestXrayClassifier {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        // Conv1 + ReLU + MaxPool
        let x = self.conv1.forward(x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Conv2 + ReLU + MaxPool
        let x = self.conv2.forward(&x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Conv3 + ReLU + MaxPool
        let x = self.conv3.forward(&x)?;
        let x = x.relu()?;
        let x = x.max_pool2d(2)?;

        // Mean over height and width -> (batch, 64)
        let x = x.mean(D::Minus1)?;
        let x = x.mean(D::Minus1)?;

        // Linear head (logit output)
        self.head.forward(&x)
    }
}
