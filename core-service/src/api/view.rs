//! Assessment View - what a presentation layer shows after a submit

use serde::{Deserialize, Serialize};

use crate::logic::context::Assessment;
use crate::logic::explain::{AttributionResult, FeatureContribution};
use crate::logic::session::SessionHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    RaisesRisk,
    LowersRisk,
    Neutral,
}

impl Direction {
    fn of(contribution: f64) -> Self {
        if contribution > 0.0 {
            Direction::RaisesRisk
        } else if contribution < 0.0 {
            Direction::LowersRisk
        } else {
            Direction::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionView {
    pub feature: String,
    pub value: f64,
    pub contribution: f64,
    pub direction: Direction,
}

impl From<&FeatureContribution> for ContributionView {
    fn from(c: &FeatureContribution) -> Self {
        Self {
            feature: c.name.clone(),
            value: c.value,
            contribution: c.contribution,
            direction: Direction::of(c.contribution),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationView {
    pub baseline: f64,
    pub model_output: f64,
    pub top: Vec<ContributionView>,
    pub other_count: usize,
    pub other_total: f64,
    /// e.g. "35 other features"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_label: Option<String>,
}

impl ExplanationView {
    pub fn new(attribution: &AttributionResult, top_k: usize) -> Self {
        let cut = attribution.top_k(top_k);
        let other_label = match cut.other_count {
            0 => None,
            1 => Some("1 other feature".to_string()),
            n => Some(format!("{} other features", n)),
        };

        Self {
            baseline: attribution.baseline,
            model_output: attribution.raw_output,
            top: cut.top.iter().map(ContributionView::from).collect(),
            other_count: cut.other_count,
            other_total: cut.other_total,
            other_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentView {
    pub label: String,
    pub churn: bool,
    pub probability: f64,
    /// Probability as a percentage with two decimals
    pub probability_display: String,
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplanationView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<f64>>,
}

impl AssessmentView {
    pub fn new(assessment: &Assessment, top_k: usize) -> Self {
        let prediction = &assessment.prediction;
        Self {
            label: prediction.label.as_str().to_string(),
            churn: prediction.is_churn(),
            probability: prediction.probability,
            probability_display: prediction.probability_percent(),
            threshold: prediction.threshold,
            explanation: assessment
                .attribution
                .as_ref()
                .map(|a| ExplanationView::new(a, top_k)),
            explanation_note: assessment.explanation_note.clone(),
            history: None,
        }
    }

    pub fn with_history(mut self, history: &SessionHistory) -> Self {
        self.history = Some(history.probabilities());
        self
    }
}
