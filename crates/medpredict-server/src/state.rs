//! Process-wide immutable service state.
//!
//! Each binary builds its state once before binding the listener and
//! shares it read-only through an `Arc`. A failed artifact load leaves the
//! model slot empty instead of aborting: the service still answers
//! `/health` truthfully and returns 503 on prediction requests.

use std::path::Path;

use medpredict_core::encode::SeverityTable;
use medpredict_core::inference::get_device;
use medpredict_core::{ChestXrayClassifier, DiseaseClassifier, XrayEncoder};
use tracing::{error, info};

/// State for the chest X-ray service.
pub struct ChestState {
    /// Loaded model, or `None` when startup loading failed.
    pub model: Option<ChestModel>,
}

/// The chest X-ray service's loaded model bundle.
pub struct ChestModel {
    /// CNN classifier.
    pub classifier: ChestXrayClassifier,
    /// Ordered class names matching the classifier's outputs.
    pub labels: Vec<String>,
    /// Request-bytes to input-tensor encoder.
    pub encoder: XrayEncoder,
}

impl ChestState {
    /// Loads the chest model artifacts from a models directory.
    ///
    /// A load failure is logged and leaves the state degraded; it does not
    /// abort startup.
    #[must_use]
    pub fn load(models_dir: &Path) -> Self {
        let device = get_device();

        let model = match medpredict_adapters::load_chest_model(models_dir, &device) {
            Ok((classifier, labels)) => Some(ChestModel {
                classifier,
                labels,
                encoder: XrayEncoder::new(device),
            }),
            Err(e) => {
                error!("Failed to load chest X-ray model: {e:#}");
                None
            }
        };

        Self { model }
    }

    /// Returns true when the model loaded successfully.
    #[must_use]
    pub const fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Class names, when the model is loaded.
    #[must_use]
    pub fn classes(&self) -> Option<&[String]> {
        self.model.as_ref().map(|m| m.labels.as_slice())
    }
}

/// State for the symptom service.
pub struct SymptomState {
    /// Loaded model, or `None` when startup loading failed.
    pub model: Option<SymptomModel>,
}

/// The symptom service's loaded model bundle.
pub struct SymptomModel {
    /// One-vs-rest disease classifier.
    pub classifier: DiseaseClassifier,
    /// Symptom-name to weight lookup, loaded once.
    pub severity: SeverityTable,
}

impl SymptomState {
    /// Loads the symptom model artifacts from a models directory.
    ///
    /// A load failure is logged and leaves the state degraded; it does not
    /// abort startup.
    #[must_use]
    pub fn load(models_dir: &Path) -> Self {
        let model = match load_symptom_model(models_dir) {
            Ok(model) => Some(model),
            Err(e) => {
                error!("Failed to load symptom model: {e:#}");
                None
            }
        };

        Self { model }
    }

    /// Returns true when the model loaded successfully.
    #[must_use]
    pub const fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}

fn load_symptom_model(models_dir: &Path) -> anyhow::Result<SymptomModel> {
    let classifier = medpredict_adapters::load_disease_classifier(models_dir)?;
    let severity = medpredict_adapters::load_severity_table(models_dir)?;

    info!(
        "Symptom service ready: {} diseases, {} symptom weights",
        classifier.num_classes(),
        severity.len()
    );

    Ok(SymptomModel {
        classifier,
        severity,
    })
}
