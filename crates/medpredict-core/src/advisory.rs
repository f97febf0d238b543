//! Advisory tier classification and content generation.
//!
//! Maps a (diagnosis, confidence) pair to a severity bracket and the fixed
//! recommendation block for that bracket. Content lives in a static table
//! so wording changes never touch the tiering logic.

use chrono::Utc;

use crate::domain::{Advisory, Diagnosis, Severity};

/// Fixed advisory content for one severity tier.
struct TierContent {
    severity: Severity,
    message: &'static str,
    recommendations: &'static [&'static str],
    next_steps: &'static str,
}

/// Advisory content, one entry per severity tier.
static TIER_CONTENT: &[TierContent] = &[
    TierContent {
        severity: Severity::High,
        message: "High probability of pneumonia detected. Immediate medical attention required.",
        recommendations: &[
            "Seek immediate medical consultation",
            "Consider emergency room visit if experiencing severe symptoms",
            "Do not delay treatment",
            "Monitor oxygen saturation if possible",
        ],
        next_steps: "URGENT: Contact healthcare provider immediately",
    },
    TierContent {
        severity: Severity::Moderate,
        message: "Pneumonia suspected. Medical evaluation recommended within 24 hours.",
        recommendations: &[
            "Schedule appointment with healthcare provider today",
            "Monitor symptoms closely",
            "Rest and stay hydrated",
            "Avoid strenuous activities",
        ],
        next_steps: "Contact healthcare provider within 24 hours",
    },
    TierContent {
        severity: Severity::LowModerate,
        message: "Possible pneumonia signs detected. Medical consultation advised.",
        recommendations: &[
            "Schedule appointment with healthcare provider",
            "Monitor respiratory symptoms",
            "Get adequate rest",
            "Consider follow-up imaging if symptoms persist",
        ],
        next_steps: "Consult healthcare provider within 2-3 days",
    },
    TierContent {
        severity: Severity::Normal,
        message: "No clear signs of pneumonia detected in this chest X-ray.",
        recommendations: &[
            "Continue monitoring symptoms if any",
            "Maintain good respiratory hygiene",
            "Follow up if symptoms worsen or persist",
        ],
        next_steps: "Continue normal activities, monitor if symptoms present",
    },
    TierContent {
        severity: Severity::Uncertain,
        message: "Results inconclusive. Additional medical evaluation recommended.",
        recommendations: &[
            "Clinical correlation with symptoms needed",
            "Consider additional imaging if clinically indicated",
            "Consult healthcare provider for interpretation",
        ],
        next_steps: "Consult healthcare provider for clinical correlation",
    },
];

/// Selects the severity tier for a diagnosis/confidence pair.
///
/// Confidence is a percentage in 0-100. Boundary values (85, 70, 80) select
/// the higher tier.
#[must_use]
pub fn tier_for(diagnosis: Diagnosis, confidence: f64) -> Severity {
    match diagnosis {
        Diagnosis::Pneumonia => {
            if confidence >= 85.0 {
                Severity::High
            } else if confidence >= 70.0 {
                Severity::Moderate
            } else {
                Severity::LowModerate
            }
        }
        Diagnosis::Normal => {
            if confidence >= 80.0 {
                Severity::Normal
            } else {
                Severity::Uncertain
            }
        }
    }
}

/// Generates the advisory block for a diagnosis/confidence pair.
///
/// Pure apart from reading the wall clock for the timestamp. The reported
/// confidence is rounded to two decimal places; tiering uses the exact
/// value passed in.
#[must_use]
pub fn advisory_for(diagnosis: Diagnosis, confidence: f64) -> Advisory {
    let severity = tier_for(diagnosis, confidence);
    let content = content_for(severity);

    Advisory {
        diagnosis,
        confidence: (confidence * 100.0).round() / 100.0,
        timestamp: Utc::now().to_rfc3339(),
        severity,
        message: content.message.to_string(),
        recommendations: content
            .recommendations
            .iter()
            .map(|&r| r.to_string())
            .collect(),
        next_steps: content.next_steps.to_string(),
    }
}

fn content_for(severity: Severity) -> &'static TierContent {
    TIER_CONTENT
        .iter()
        .find(|c| c.severity == severity)
        .unwrap_or(&TIER_CONTENT[0]) // table covers every variant
}
