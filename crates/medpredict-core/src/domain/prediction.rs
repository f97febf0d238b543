//! Prediction result types for the chest X-ray classifier.

use serde::{Deserialize, Serialize};

/// Number of probability values the chest X-ray model must emit.
pub const EXPECTED_OUTPUT_LEN: usize = 2;

/// Binary diagnosis derived from the classifier's two class probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Diagnosis {
    /// No clear signs of pneumonia.
    Normal,
    /// Pneumonia detected.
    Pneumonia,
}

impl Diagnosis {
    /// Returns the diagnosis as its wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Pneumonia => "PNEUMONIA",
        }
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The model emitted a number of values other than the two expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Model returned {actual} values instead of {EXPECTED_OUTPUT_LEN}")]
pub struct OutputShapeError {
    /// Number of values the model actually produced.
    pub actual: usize,
}

/// Per-class probabilities as percentages (0-100).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Probabilities {
    /// Probability of the NORMAL class.
    #[serde(serialize_with = "two_decimals")]
    pub normal: f64,
    /// Probability of the PNEUMONIA class.
    #[serde(serialize_with = "two_decimals")]
    pub pneumonia: f64,
}

/// Complete prediction for one X-ray image.
///
/// Confidence and probabilities are held at full precision so that advisory
/// tiering sees the exact model output; they serialize rounded to two
/// decimal places.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Prediction {
    /// Derived binary diagnosis.
    pub diagnosis: Diagnosis,
    /// The higher of the two class probabilities, as a percentage.
    #[serde(serialize_with = "two_decimals")]
    pub confidence: f64,
    /// Both class probabilities.
    pub probabilities: Probabilities,
}

impl Prediction {
    /// Derives a prediction from the model's flattened probability output.
    ///
    /// Index 0 is NORMAL and index 1 is PNEUMONIA; the order is fixed by
    /// training and never introspected. A tie resolves to NORMAL.
    ///
    /// # Errors
    ///
    /// Returns [`OutputShapeError`] if the output does not hold exactly two
    /// values.
    pub fn from_output(output: &[f32]) -> Result<Self, OutputShapeError> {
        if output.len() != EXPECTED_OUTPUT_LEN {
            return Err(OutputShapeError {
                actual: output.len(),
            });
        }

        let normal = f64::from(output[0]) * 100.0;
        let pneumonia = f64::from(output[1]) * 100.0;

        let diagnosis = if pneumonia > normal {
            Diagnosis::Pneumonia
        } else {
            Diagnosis::Normal
        };

        Ok(Self {
            diagnosis,
            confidence: normal.max(pneumonia),
            probabilities: Probabilities { normal, pneumonia },
        })
    }
}

/// Serializes a float rounded to two decimal places.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde signature
fn two_decimals<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
