//! Advisory output types.

use serde::{Deserialize, Serialize};

use super::Diagnosis;

/// Severity bracket derived from diagnosis and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// High-confidence pneumonia finding.
    #[serde(rename = "HIGH")]
    High,
    /// Pneumonia suspected.
    #[serde(rename = "MODERATE")]
    Moderate,
    /// Possible pneumonia signs.
    #[serde(rename = "LOW-MODERATE")]
    LowModerate,
    /// Confident normal finding.
    #[serde(rename = "NORMAL")]
    Normal,
    /// Inconclusive normal finding.
    #[serde(rename = "UNCERTAIN")]
    Uncertain,
}

/// Structured medical advice attached to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// Diagnosis the advice was generated for.
    pub diagnosis: Diagnosis,
    /// Confidence percentage, rounded to two decimal places.
    pub confidence: f64,
    /// Generation time (RFC 3339).
    pub timestamp: String,
    /// Severity bracket.
    pub severity: Severity,
    /// Human-readable summary for this tier.
    pub message: String,
    /// Ordered recommendations for this tier.
    pub recommendations: Vec<String>,
    /// What the patient should do next.
    pub next_steps: String,
}
