use serde::{Deserialize, Serialize};

/// Space the attribution is additive in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSpace {
    /// Classifier raw output (log-odds)
    Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,        // transformed feature value
    pub contribution: f64, // signed, in output space units
}

/// Per-record attribution; only meaningful for the model/record pair that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub baseline: f64,
    pub raw_output: f64,
    pub output_space: OutputSpace,
    /// Ranked by |contribution| descending, ties in feature order
    pub contributions: Vec<FeatureContribution>,
}

/// Display cut of a ranked attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopContributions {
    pub top: Vec<FeatureContribution>,
    pub other_count: usize,
    pub other_total: f64,
}

impl AttributionResult {
    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.contribution).sum()
    }

    /// baseline + sum of contributions
    pub fn reconstructed(&self) -> f64 {
        self.baseline + self.total()
    }

    /// Distance between the reconstruction and the explained output
    pub fn residual(&self) -> f64 {
        (self.reconstructed() - self.raw_output).abs()
    }

    /// First `k` contributions; the rest collapse into a count and a sum
    pub fn top_k(&self, k: usize) -> TopContributions {
        let split = k.min(self.contributions.len());
        let (top, rest) = self.contributions.split_at(split);
        TopContributions {
            top: top.to_vec(),
            other_count: rest.len(),
            other_total: rest.iter().map(|c| c.contribution).sum(),
        }
    }
}
