//! ML inference engines using Candle.
//!
//! Provides model loading and inference for:
//! - Chest X-ray pneumonia classification (CNN, safetensors weights)
//! - Disease prediction from symptom vectors (one-vs-rest SVM, JSON)

pub mod chest;
pub mod loader;
pub mod svm;

pub use chest::ChestXrayClassifier;
pub use svm::DiseaseClassifier;

use candle_core::Device;
use tracing::info;

/// Returns the best available device for inference.
///
/// Detects and uses GPU (Metal on macOS, CUDA on Linux/Windows) when the
/// matching feature is enabled, falling back to CPU.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Using Metal device for inference");
            return device;
        }
    }

    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA device for inference");
            return device;
        }
    }

    info!("Using CPU for inference");
    Device::Cpu
}
