//! Core domain types shared by both services.

mod advisory;
mod prediction;

pub use advisory::{Advisory, Severity};
pub use prediction::{Diagnosis, OutputShapeError, Prediction, Probabilities};
