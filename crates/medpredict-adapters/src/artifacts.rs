//! Model artifact registry and integrity checks.
//!
//! Artifacts are provisioned out-of-band (exported from the training
//! pipeline) into a models directory; this module names the expected files
//! and verifies what is present.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Artifact metadata.
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    /// Artifact name/identifier.
    pub name: &'static str,
    /// Filename in the models directory.
    pub filename: &'static str,
    /// Expected SHA256 hash. Set to all zeros to skip verification during development.
    pub sha256: &'static str,
}

/// Artifacts the services expect to find in the models directory.
pub const ARTIFACTS: &[ArtifactInfo] = &[
    ArtifactInfo {
        name: "chest-xray-weights",
        filename: "chest_xray.safetensors",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: Update with real hash
    },
    ArtifactInfo {
        name: "chest-xray-labels",
        filename: "chest_xray_labels.json",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: Update with real hash
    },
    ArtifactInfo {
        name: "disease-svm",
        filename: "disease_svm.json",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: Update with real hash
    },
    ArtifactInfo {
        name: "symptom-severity",
        filename: "symptom_severity.csv",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000", // TODO: Update with real hash
    },
];

/// Returns the default models directory path.
///
/// Uses `XDG_DATA_HOME/medpredict/models` or `~/.local/share/medpredict/models`.
#[must_use]
pub fn artifacts_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medpredict")
        .join("models")
}

/// Returns the path of a named artifact inside a models directory.
#[must_use]
pub fn artifact_path(dir: &Path, name: &str) -> Option<PathBuf> {
    ARTIFACTS
        .iter()
        .find(|a| a.name == name)
        .map(|a| dir.join(a.filename))
}

/// Verifies an artifact file against its registered checksum.
///
/// Placeholder checksums skip verification.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its hash does not match.
pub fn verify_artifact(artifact: &ArtifactInfo, dir: &Path) -> Result<()> {
    if artifact.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            artifact.name
        );
        return Ok(());
    }

    let path = dir.join(artifact.filename);
    let bytes = std::fs::read(&path)
        .with_context(|| format!("Failed to read artifact: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let hash = format!("{:x}", hasher.finalize());

    if hash != artifact.sha256 {
        anyhow::bail!(
            "Checksum mismatch for {}: expected {}, got {}",
            artifact.name,
            artifact.sha256,
            hash
        );
    }

    Ok(())
}

/// Lists registered artifacts missing from a models directory.
#[must_use]
pub fn missing_artifacts(dir: &Path) -> Vec<&'static str> {
    ARTIFACTS
        .iter()
        .filter(|a| !dir.join(a.filename).exists())
        .map(|a| a.name)
        .collect()
}

/// Checks whether every registered artifact is present.
#[must_use]
pub fn all_present(dir: &Path) -> bool {
    missing_artifacts(dir).is_empty()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_dir() {
        let dir = artifacts_dir();
        assert!(dir.ends_with("medpredict/models"));
    }

    #[test]
    fn test_artifact_path() {
        let dir = Path::new("/models");
        let path = artifact_path(dir, "chest-xray-weights").unwrap();
        assert!(path.ends_with("chest_xray.safetensors"));
    }

    #[test]
    fn test_artifact_path_unknown() {
        assert!(artifact_path(Path::new("/models"), "unknown").is_none());
    }

    #[test]
    fn test_missing_artifacts_in_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = missing_artifacts(dir.path());
        assert_eq!(missing.len(), ARTIFACTS.len());
        assert!(!all_present(dir.path()));
    }

    #[test]
    fn test_present_artifacts_are_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("disease_svm.json"), "{}").unwrap();

        let missing = missing_artifacts(dir.path());
        assert!(!missing.contains(&"disease-svm"));
        assert!(missing.contains(&"chest-xray-weights"));
    }

    #[test]
    fn test_placeholder_checksum_skips_verification() {
        // File does not even need to exist when the checksum is a placeholder.
        let dir = tempfile::tempdir().unwrap();
        assert!(verify_artifact(&ARTIFACTS[0], dir.path()).is_ok());
    }

    #[test]
    fn test_checksum_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.bin"), b"payload").unwrap();

        let artifact = ArtifactInfo {
            name: "data",
            filename: "data.bin",
            sha256: "1111111111111111111111111111111111111111111111111111111111111111",
        };
        assert!(verify_artifact(&artifact, dir.path()).is_err());
    }
}
