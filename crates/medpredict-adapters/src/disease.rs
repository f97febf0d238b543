//! Disease classifier and severity table loading.

use anyhow::{bail, Context, Result};
use medpredict_core::encode::{SeverityTable, FEATURE_LEN};
use medpredict_core::DiseaseClassifier;
use std::path::Path;
use tracing::info;

/// SVM artifact filename inside the models directory.
pub const SVM_FILE: &str = "disease_svm.json";
/// Severity table artifact filename inside the models directory.
pub const SEVERITY_FILE: &str = "symptom_severity.csv";

/// Loads the disease SVM from a models directory.
///
/// # Errors
///
/// Returns an error if the artifact is missing or invalid, or if the
/// model's feature length does not match the symptom encoder's. The
/// mismatch is a configuration error, so it fails here at startup rather
/// than on a request.
pub fn load_disease_classifier(dir: &Path) -> Result<DiseaseClassifier> {
    let path = dir.join(SVM_FILE);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read SVM model: {}", path.display()))?;

    let classifier = DiseaseClassifier::from_json(&content)
        .with_context(|| format!("Failed to load SVM model: {}", path.display()))?;

    if classifier.feature_len() != FEATURE_LEN {
        bail!(
            "SVM model was trained on {}-entry feature vectors, the encoder produces {}",
            classifier.feature_len(),
            FEATURE_LEN
        );
    }

    info!(
        "Loaded disease classifier with {} classes",
        classifier.num_classes()
    );

    Ok(classifier)
}

/// Loads the symptom severity table from a models directory.
///
/// # Errors
///
/// Returns an error if the CSV is missing or malformed.
pub fn load_severity_table(dir: &Path) -> Result<SeverityTable> {
    let path = dir.join(SEVERITY_FILE);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read severity table: {}", path.display()))?;

    let table = parse_severity_csv(&content)
        .with_context(|| format!("Failed to parse severity table: {}", path.display()))?;

    info!("Loaded severity table with {} symptoms", table.len());

    Ok(table)
}

/// Parses severity CSV content with `Symptom` and `weight` columns.
///
/// Rows keep file order; the encoder's first-match-wins lookup depends on
/// that.
fn parse_severity_csv(content: &str) -> Result<SeverityTable> {
    let mut lines = content.lines();

    let header = lines.next().context("Empty severity CSV")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let symptom_idx = columns
        .iter()
        .position(|&c| c == "Symptom")
        .context("Missing Symptom column")?;
    let weight_idx = columns
        .iter()
        .position(|&c| c == "weight")
        .context("Missing weight column")?;

    let mut entries = Vec::new();

    for (line_num, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(',').map(str::trim).collect();

        if values.len() != columns.len() {
            bail!(
                "Line {} has {} columns, expected {}",
                line_num + 2,
                values.len(),
                columns.len()
            );
        }

        let weight: u32 = values[weight_idx]
            .parse()
            .with_context(|| format!("Invalid weight at line {}", line_num + 2))?;

        entries.push((values[symptom_idx].to_string(), weight));
    }

    Ok(SeverityTable::new(entries))
}
