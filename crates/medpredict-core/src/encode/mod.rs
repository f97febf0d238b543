//! Per-request feature encoding.
//!
//! Turns raw request payloads into the exact tensor/vector shapes the
//! loaded models were trained on.

mod image;
mod symptoms;

pub use image::{is_allowed_extension, PreprocessError, XrayEncoder, ALLOWED_EXTENSIONS};
pub use symptoms::{encode_symptoms, EncodeError, SeverityTable, FEATURE_LEN};
