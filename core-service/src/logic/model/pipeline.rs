//! Pipeline - preprocessing step + classifier step
//!
//! Mirrors the behavioral contract of a trained pipeline: `transform`,
//! `predict_proba`, `predict`, plus access to the named `processor` and
//! `classifier` steps. Every operation takes a table (a slice of records)
//! and is pure: the same table always yields bit-identical output.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::classifier::{sigmoid, Classifier};
use super::preprocess::{Preprocessor, PreprocessorSpec};
use super::threshold::DecisionThreshold;
use crate::logic::error::{ChurnError, ChurnResult};
use crate::logic::record::CustomerRecord;

/// Artifact form of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub preprocessor: PreprocessorSpec,
    pub classifier: Classifier,
    #[serde(default)]
    pub threshold: DecisionThreshold,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    processor: Preprocessor,
    classifier: Classifier,
    threshold: DecisionThreshold,
    feature_names: Vec<String>,
}

impl Pipeline {
    /// Build and schema-check a pipeline.
    ///
    /// `feature_names` overrides the generated transformed feature names and
    /// must have one entry per transformed feature.
    pub fn from_spec(spec: PipelineSpec, feature_names: Option<Vec<String>>) -> ChurnResult<Self> {
        let processor = Preprocessor::from_spec(spec.preprocessor)?;
        let width = processor.width();
        spec.classifier.check_width(width)?;

        let feature_names = match feature_names {
            Some(names) if names.len() != width => {
                return Err(ChurnError::schema(format!(
                    "artifact lists {} feature names, preprocessor produces {} features",
                    names.len(),
                    width
                )));
            }
            Some(names) => names,
            None => processor.output_names(),
        };

        Ok(Self {
            processor,
            classifier: spec.classifier,
            threshold: spec.threshold,
            feature_names,
        })
    }

    /// The `processor` step
    pub fn processor(&self) -> &Preprocessor {
        &self.processor
    }

    /// The `classifier` step
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    /// Names of the transformed features, in matrix column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn transform(&self, table: &[CustomerRecord]) -> ChurnResult<Array2<f64>> {
        self.processor.transform(table)
    }

    /// Raw classifier output (log-odds) per row
    pub fn decision_function(&self, table: &[CustomerRecord]) -> ChurnResult<Array1<f64>> {
        let features = self.transform(table)?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| self.classifier.decision_function(row))
            .collect())
    }

    /// `n_rows x 2` matrix of [P(not churn), P(churn)]
    pub fn predict_proba(&self, table: &[CustomerRecord]) -> ChurnResult<Array2<f64>> {
        let margins = self.decision_function(table)?;
        let mut proba = Array2::<f64>::zeros((margins.len(), 2));
        for (i, margin) in margins.iter().enumerate() {
            let p = sigmoid(*margin);
            proba[[i, 0]] = 1.0 - p;
            proba[[i, 1]] = p;
        }
        Ok(proba)
    }

    /// Class per row: 1 = churn, 0 = not churn
    pub fn predict(&self, table: &[CustomerRecord]) -> ChurnResult<Array1<u8>> {
        let proba = self.predict_proba(table)?;
        Ok(proba
            .column(1)
            .iter()
            .map(|p| self.threshold.is_churn(*p) as u8)
            .collect())
    }
}
