//! Disease classifier over symptom feature vectors.
//!
//! Inference-only one-vs-rest SVM. Training happens offline; models are
//! loaded from JSON artifacts produced by the training pipeline.
//!
//! - Linear kernel: `f(x) = w.x - rho`
//! - RBF kernel: `f(x) = sum(alpha_i * exp(-gamma * ||x - x_i||^2)) - rho`
//!
//! Prediction is the label of the class with the highest decision score.

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Kernel used by every per-class decision function in a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// Dot-product kernel.
    Linear,
    /// Radial basis function kernel.
    Rbf,
}

/// One-vs-rest decision function for a single class.
#[derive(Debug)]
enum ClassModel {
    Linear {
        label: String,
        weights: Array1<f64>,
        rho: f64,
    },
    Rbf {
        label: String,
        alpha: Vec<f64>,
        support_vectors: Array2<f64>,
        rho: f64,
        gamma: f64,
    },
}

impl ClassModel {
    fn label(&self) -> &str {
        match self {
            Self::Linear { label, .. } | Self::Rbf { label, .. } => label,
        }
    }

    fn decision(&self, x: &ArrayView1<'_, f64>) -> f64 {
        match self {
            Self::Linear { weights, rho, .. } => weights.dot(x) - rho,
            Self::Rbf {
                alpha,
                support_vectors,
                rho,
                gamma,
                ..
            } => {
                let mut sum = 0.0;
                for (alpha_i, sv) in alpha.iter().zip(support_vectors.rows()) {
                    let sq_dist: f64 = x
                        .iter()
                        .zip(sv.iter())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    sum += alpha_i * (-gamma * sq_dist).exp();
                }
                sum - rho
            }
        }
    }
}

/// Serialized form of one linear class model.
#[derive(Debug, Serialize, Deserialize)]
struct LinearClassData {
    label: String,
    weights: Vec<f64>,
    rho: f64,
}

/// Serialized form of one RBF class model.
#[derive(Debug, Serialize, Deserialize)]
struct RbfClassData {
    label: String,
    alpha: Vec<f64>,
    support_vectors: Vec<Vec<f64>>,
    rho: f64,
    gamma: f64,
}

/// On-disk JSON layout of a trained model.
#[derive(Debug, Serialize, Deserialize)]
struct SvmModelData {
    kernel: Kernel,
    feature_len: usize,
    #[serde(default)]
    linear: Vec<LinearClassData>,
    #[serde(default)]
    rbf: Vec<RbfClassData>,
}

/// One-vs-rest SVM disease classifier.
#[derive(Debug)]
pub struct DiseaseClassifier {
    classes: Vec<ClassModel>,
    kernel: Kernel,
    feature_len: usize,
}

impl DiseaseClassifier {
    /// Loads a classifier from its JSON serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the model holds no
    /// classes, or any class's dimensions disagree with `feature_len`.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: SvmModelData =
            serde_json::from_str(json).context("Failed to parse SVM model JSON")?;

        if data.feature_len == 0 {
            bail!("SVM model declares a zero feature length");
        }

        let mut classes = Vec::with_capacity(data.linear.len() + data.rbf.len());

        for c in data.linear {
            if c.weights.len() != data.feature_len {
                bail!(
                    "Class '{}' has {} weights, expected {}",
                    c.label,
                    c.weights.len(),
                    data.feature_len
                );
            }
            classes.push(ClassModel::Linear {
                label: c.label,
                weights: Array1::from_vec(c.weights),
                rho: c.rho,
            });
        }

        for c in data.rbf {
            if c.alpha.len() != c.support_vectors.len() {
                bail!(
                    "Class '{}' has {} alpha values for {} support vectors",
                    c.label,
                    c.alpha.len(),
                    c.support_vectors.len()
                );
            }
            let rows = c.support_vectors.len();
            let flat: Vec<f64> = c.support_vectors.into_iter().flatten().collect();
            let support_vectors = Array2::from_shape_vec((rows, data.feature_len), flat)
                .with_context(|| {
                    format!(
                        "Class '{}' has support vectors of the wrong dimension",
                        c.label
                    )
                })?;
            classes.push(ClassModel::Rbf {
                label: c.label,
                alpha: c.alpha,
                support_vectors,
                rho: c.rho,
                gamma: c.gamma,
            });
        }

        if classes.is_empty() {
            bail!("SVM model holds no classes");
        }

        Ok(Self {
            classes,
            kernel: data.kernel,
            feature_len: data.feature_len,
        })
    }

    /// Feature-vector length the model was trained on.
    #[must_use]
    pub const fn feature_len(&self) -> usize {
        self.feature_len
    }

    /// Number of classes the model can predict.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Kernel the model was trained with.
    #[must_use]
    pub const fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Class labels in model order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(ClassModel::label)
    }

    /// Predicts the disease label for an encoded feature vector.
    ///
    /// Returns the label of the class with the highest decision score; on
    /// equal scores the earlier class wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature vector's length does not match the
    /// model's feature length.
    pub fn predict(&self, features: &[f64]) -> Result<&str> {
        if features.len() != self.feature_len {
            bail!(
                "Feature vector has {} entries, model was trained on {}",
                features.len(),
                self.feature_len
            );
        }

        let x = ArrayView1::from(features);

        let mut best: Option<(&ClassModel, f64)> = None;
        for class in &self.classes {
            let score = class.decision(&x);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((class, score)),
            }
        }

        // classes is verified non-empty at load time
        best.map(|(class, _)| class.label())
            .context("SVM model holds no classes")
    }
}
