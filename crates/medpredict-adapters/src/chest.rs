//! Chest X-ray model loading.

use anyhow::{bail, Context, Result};
use candle_core::Device;
use medpredict_core::inference::loader::load_safetensors;
use medpredict_core::ChestXrayClassifier;
use std::path::Path;
use tracing::info;

/// Weights artifact filename inside the models directory.
pub const WEIGHTS_FILE: &str = "chest_xray.safetensors";
/// Label list artifact filename inside the models directory.
pub const LABELS_FILE: &str = "chest_xray_labels.json";

/// Loads the chest X-ray classifier and its label list from a models
/// directory.
///
/// The classifier head is sized by the label list, so the two artifacts
/// must come from the same training run.
///
/// # Errors
///
/// Returns an error if either artifact is missing or invalid, or if the
/// label list is empty.
pub fn load_chest_model(dir: &Path, device: &Device) -> Result<(ChestXrayClassifier, Vec<String>)> {
    let labels = load_labels(&dir.join(LABELS_FILE))?;

    let vb = load_safetensors(dir.join(WEIGHTS_FILE), device)?;
    let classifier = ChestXrayClassifier::new(vb, labels.len())
        .context("Failed to build chest X-ray classifier from weights")?;

    info!(
        "Loaded chest X-ray classifier with {} classes: {:?}",
        labels.len(),
        labels
    );

    Ok((classifier, labels))
}

/// Loads the ordered class label list.
fn load_labels(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read label file: {}", path.display()))?;

    let labels: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse label file: {}", path.display()))?;

    if labels.is_empty() {
        bail!("Label file {} holds no classes", path.display());
    }

    Ok(labels)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r#"["NORMAL", "PNEUMONIA"]"#).unwrap();

        let labels = load_labels(&path).unwrap();
        assert_eq!(labels, vec!["NORMAL", "PNEUMONIA"]);
    }

    #[test]
    fn test_load_labels_missing_file() {
        assert!(load_labels(Path::new("/nonexistent/labels.json")).is_err());
    }

    #[test]
    fn test_load_labels_rejects_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(load_labels(&path).is_err());
    }

    #[test]
    fn test_load_labels_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r#"{"not": "a list"}"#).unwrap();

        assert!(load_labels(&path).is_err());
    }

    #[test]
    fn test_load_chest_model_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(LABELS_FILE),
            r#"["NORMAL", "PNEUMONIA"]"#,
        )
        .unwrap();

        let result = load_chest_model(dir.path(), &Device::Cpu);
        assert!(result.is_err());
    }
}
