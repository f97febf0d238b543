//! Medpredict Core - Domain logic and inference engines
//!
//! This crate contains the domain types, feature/tensor encoders, the
//! advisory tier classifier, and the two inference engines: a candle CNN
//! for chest X-ray classification and a one-vs-rest SVM for disease
//! prediction from symptom vectors.

pub mod advisory;
pub mod domain;
pub mod encode;
pub mod inference;

pub use domain::{Advisory, Diagnosis, OutputShapeError, Prediction, Probabilities, Severity};
pub use encode::{SeverityTable, XrayEncoder};
pub use inference::{ChestXrayClassifier, DiseaseClassifier};
