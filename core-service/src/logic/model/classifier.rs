//! Classifier - binary classifier step of the pipeline
//!
//! Both supported families produce a raw margin (log-odds) per row; the
//! positive-class probability is `sigmoid(margin)`.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::logic::error::{ChurnError, ChurnResult};

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Logistic(LogisticRegression),
    GradientBoosting(TreeEnsemble),
}

impl Classifier {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Classifier::Logistic(_) => "logistic",
            Classifier::GradientBoosting(_) => "gradient_boosting",
        }
    }

    /// Raw output (log-odds) for one transformed row
    pub fn decision_function(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self {
            Classifier::Logistic(model) => model.margin(row),
            Classifier::GradientBoosting(model) => model.margin(row),
        }
    }

    /// Positive-class probability for one transformed row
    pub fn probability(&self, row: ArrayView1<'_, f64>) -> f64 {
        sigmoid(self.decision_function(row))
    }

    /// Check the classifier consumes exactly `width` transformed features
    pub fn check_width(&self, width: usize) -> ChurnResult<()> {
        match self {
            Classifier::Logistic(model) => model.check_width(width),
            Classifier::GradientBoosting(model) => model.check_width(width),
        }
    }

    /// Expected transformed feature values, if the artifact ships them
    pub fn background(&self) -> Option<&[f64]> {
        match self {
            Classifier::Logistic(model) => model.background.as_deref(),
            Classifier::GradientBoosting(_) => None,
        }
    }
}

pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Mean of each transformed feature over the training data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Vec<f64>>,
}

impl LogisticRegression {
    pub fn margin(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    fn check_width(&self, width: usize) -> ChurnResult<()> {
        if self.coefficients.len() != width {
            return Err(ChurnError::schema(format!(
                "logistic classifier has {} coefficients, preprocessor produces {} features",
                self.coefficients.len(),
                width
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ChurnError::schema("logistic classifier has non-finite weights"));
        }
        if let Some(background) = &self.background {
            if background.len() != width {
                return Err(ChurnError::schema(format!(
                    "background has {} values, preprocessor produces {} features",
                    background.len(),
                    width
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// GRADIENT BOOSTED TREES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Initial margin before any tree
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn margin(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base_score + self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>()
    }

    fn check_width(&self, width: usize) -> ChurnResult<()> {
        if self.trees.is_empty() {
            return Err(ChurnError::schema("gradient boosting classifier has no trees"));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(width)
                .map_err(|e| ChurnError::schema(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

/// Node of a binary decision tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Rows with `x[feature] <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cover: Option<f64>,
    },
    Leaf {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cover: Option<f64>,
    },
}

impl TreeNode {
    /// Training sample weight that reached this node
    pub fn cover(&self) -> Option<f64> {
        match self {
            TreeNode::Split { cover, .. } | TreeNode::Leaf { cover, .. } => *cover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split { feature, threshold, left, right, .. } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Children must point forward, which also rules out cycles
    fn check(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right, .. } => {
                    if *feature >= width {
                        return Err(format!(
                            "node {} splits on feature {}, only {} exist",
                            i, feature, width
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }
}
