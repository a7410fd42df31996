//! Decision Threshold
//!
//! The single cut-off that turns the positive-class probability into a
//! label. Both the reported label and the reported probability derive from
//! the same value, so a label of NotChurn never accompanies a probability at
//! or above the threshold.

use serde::{Deserialize, Serialize};

/// Default cut-off when the artifact does not specify one
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Churn iff probability >= threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecisionThreshold(f64);

impl DecisionThreshold {
    /// Threshold must lie strictly inside (0, 1)
    pub fn new(value: f64) -> Result<Self, String> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(format!("decision threshold {} is outside (0, 1)", value))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// Positive class decision for a probability
    pub fn is_churn(&self, probability: f64) -> bool {
        probability >= self.0
    }
}

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for DecisionThreshold {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecisionThreshold> for f64 {
    fn from(threshold: DecisionThreshold) -> Self {
        threshold.0
    }
}
