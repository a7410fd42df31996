//! Session History - probabilities of successful predictions, in call order
//!
//! Lives only as long as its session. When a limit is set the oldest
//! entries are dropped once it is exceeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::model::{ChurnLabel, PredictionResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub probability: f64,
    pub label: ChurnLabel,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that keeps at most `limit` entries; `None` keeps everything
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub fn record(&mut self, result: &PredictionResult) {
        self.push(HistoryEntry {
            probability: result.probability,
            label: result.label,
            recorded_at: Utc::now(),
        });
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.probability).collect()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
