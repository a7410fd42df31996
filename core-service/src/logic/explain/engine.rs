use ndarray::{ArrayView1, ArrayView2};

use super::tree_shap;
use super::types::{AttributionResult, FeatureContribution, OutputSpace};
use crate::logic::error::{ChurnError, ChurnResult};
use crate::logic::model::classifier::{Classifier, LogisticRegression, TreeEnsemble};

/// Additive feature attribution for one classifier family.
///
/// Built once per loaded model and shared across requests.
pub trait Explainer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Expected margin over the background distribution
    fn baseline(&self) -> f64;

    /// Margin the attribution reconciles against
    fn raw_output(&self, row: ArrayView1<'_, f64>) -> f64;

    /// One contribution per transformed feature, in feature order
    fn contributions(&self, row: ArrayView1<'_, f64>) -> Vec<f64>;

    /// Ranked attribution for one transformed row
    fn explain_row(&self, row: ArrayView1<'_, f64>, feature_names: &[String]) -> AttributionResult {
        let contributions = row
            .iter()
            .zip(self.contributions(row))
            .enumerate()
            .map(|(i, (value, contribution))| FeatureContribution {
                name: feature_names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("feature_{}", i)),
                value: *value,
                contribution,
            })
            .collect();

        AttributionResult {
            baseline: self.baseline(),
            raw_output: self.raw_output(row),
            output_space: OutputSpace::Margin,
            contributions: rank(contributions),
        }
    }

    /// One attribution per matrix row
    fn explain(&self, features: ArrayView2<'_, f64>, feature_names: &[String]) -> Vec<AttributionResult> {
        features
            .rows()
            .into_iter()
            .map(|row| self.explain_row(row, feature_names))
            .collect()
    }
}

/// Pick the explainer for the loaded classifier
pub fn make_explainer(classifier: &Classifier) -> ChurnResult<Box<dyn Explainer>> {
    let explainer: Box<dyn Explainer> = match classifier {
        Classifier::Logistic(model) => Box::new(LinearExplainer::new(model)?),
        Classifier::GradientBoosting(model) => Box::new(TreeExplainer::new(model)?),
    };
    log::info!(
        "Explainer ready: {} (baseline {:.6})",
        explainer.name(),
        explainer.baseline()
    );
    Ok(explainer)
}

/// Stable sort by |contribution| descending
pub fn rank(mut contributions: Vec<FeatureContribution>) -> Vec<FeatureContribution> {
    contributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    contributions
}

/// Check baseline + sum(contributions) reproduces `expected`
pub fn verify(result: &AttributionResult, expected: f64, tolerance: f64) -> ChurnResult<()> {
    let reconstructed = result.reconstructed();
    if (reconstructed - expected).abs() < tolerance {
        Ok(())
    } else {
        Err(ChurnError::ExplanationMismatch {
            expected,
            reconstructed,
            tolerance,
        })
    }
}

// ============================================================================
// LINEAR
// ============================================================================

/// phi_i = w_i * (x_i - E[x_i]), assuming independent features
pub struct LinearExplainer {
    coefficients: Vec<f64>,
    intercept: f64,
    background: Vec<f64>,
    baseline: f64,
}

impl LinearExplainer {
    pub fn new(model: &LogisticRegression) -> ChurnResult<Self> {
        let background = model.background.clone().ok_or_else(|| {
            ChurnError::explainer_unavailable("logistic artifact has no background expectation")
        })?;
        if background.len() != model.coefficients.len() {
            return Err(ChurnError::explainer_unavailable(format!(
                "background has {} values for {} coefficients",
                background.len(),
                model.coefficients.len()
            )));
        }

        let baseline = model.intercept
            + model
                .coefficients
                .iter()
                .zip(&background)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(Self {
            coefficients: model.coefficients.clone(),
            intercept: model.intercept,
            background,
            baseline,
        })
    }
}

impl Explainer for LinearExplainer {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn baseline(&self) -> f64 {
        self.baseline
    }

    fn raw_output(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    fn contributions(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.background)
            .zip(row.iter())
            .map(|((w, m), x)| w * (x - m))
            .collect()
    }
}

// ============================================================================
// TREES
// ============================================================================

/// Path-dependent TreeSHAP summed over the ensemble
pub struct TreeExplainer {
    model: TreeEnsemble,
    baseline: f64,
}

impl TreeExplainer {
    pub fn new(model: &TreeEnsemble) -> ChurnResult<Self> {
        let mut baseline = model.base_score;
        for (i, tree) in model.trees.iter().enumerate() {
            tree_shap::check_covers(tree).map_err(|e| {
                ChurnError::explainer_unavailable(format!("tree {}: {}", i, e))
            })?;
            baseline += tree_shap::expected_value(tree, 0);
        }

        Ok(Self {
            model: model.clone(),
            baseline,
        })
    }
}

impl Explainer for TreeExplainer {
    fn name(&self) -> &'static str {
        "tree_shap"
    }

    fn baseline(&self) -> f64 {
        self.baseline
    }

    fn raw_output(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.model.margin(row)
    }

    fn contributions(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut phi = vec![0.0; row.len()];
        for tree in &self.model.trees {
            tree_shap::accumulate(tree, row, &mut phi);
        }
        phi
    }
}
