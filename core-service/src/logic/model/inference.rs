//! Prediction output types
//!
//! `PredictionResult` is produced fresh per record and never persisted.

use serde::{Deserialize, Serialize};

/// Human-readable class tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    Churn,
    NotChurn,
}

impl ChurnLabel {
    /// Map the classifier's class index (1 = churn)
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::NotChurn
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Churn => "Churn",
            ChurnLabel::NotChurn => "Not Churn",
        }
    }
}

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ChurnLabel,
    pub probability: f64,   // P(churn), unrounded
    pub margin: f64,        // log-odds
    pub threshold: f64,
    pub inference_time_us: u64,
}

impl PredictionResult {
    pub fn is_churn(&self) -> bool {
        self.label == ChurnLabel::Churn
    }

    /// Display form, e.g. `93.97%`
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}
