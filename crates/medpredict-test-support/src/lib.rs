//! Medpredict Test Support - Synthetic fixtures
//!
//! Builders for model artifacts and request payloads with fully
//! predictable behavior: zeroed CNN weights route the head bias straight
//! through softmax, and one-hot SVM fixtures make the winning class a
//! function of the strongest feature.

mod builders;

pub use builders::{
    severity_csv, svm_one_hot_json, write_chest_fixtures, write_symptom_fixtures,
    xray_image, xray_png_bytes,
};
