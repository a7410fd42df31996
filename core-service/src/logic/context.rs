//! Inference Context - loaded once, shared read-only by every request
//!
//! Validation -> Prediction -> Explanation. A missing explainer never
//! blocks a prediction: the assessment comes back without attribution and
//! carries the reason instead.

use std::time::Instant;

use serde::Serialize;

use super::config::ServiceConfig;
use super::error::{ChurnError, ChurnResult};
use super::explain::{make_explainer, verify, AttributionResult, Explainer};
use super::model::{load_model, ChurnLabel, LoadedModel, ModelMetadata, Pipeline, PredictionResult};
use super::record::{CustomerRecord, RawRecord};
use super::session::SessionHistory;

/// Prediction plus its explanation, when one could be produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub prediction: PredictionResult,
    pub attribution: Option<AttributionResult>,
    /// Why `attribution` is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_note: Option<String>,
}

pub struct InferenceContext {
    model: LoadedModel,
    explainer: Result<Box<dyn Explainer>, String>,
    config: ServiceConfig,
}

impl InferenceContext {
    /// Load the artifact named by `config` and build its explainer
    pub fn load(config: ServiceConfig) -> ChurnResult<Self> {
        let model = load_model(&config.model_path, config.model_sha256.as_deref())?;
        Ok(Self::from_model(model, config))
    }

    pub fn from_model(model: LoadedModel, config: ServiceConfig) -> Self {
        let explainer = if config.explain_enabled {
            make_explainer(model.pipeline.classifier()).map_err(|e| {
                log::warn!("Explanations disabled for '{}': {}", model.metadata.name, e);
                match e {
                    ChurnError::ExplainerUnavailable(reason) => reason,
                    other => other.to_string(),
                }
            })
        } else {
            log::info!("Explanations disabled by configuration");
            Err("explanations are disabled".to_string())
        };

        Self {
            model,
            explainer,
            config,
        }
    }

    /// Swap in a different explainer for the loaded classifier
    pub fn with_explainer(mut self, explainer: Box<dyn Explainer>) -> Self {
        log::info!("Using explainer '{}' for '{}'", explainer.name(), self.model.metadata.name);
        self.explainer = Ok(explainer);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.model.metadata
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.model.pipeline
    }

    /// Name of the active explainer, if any
    pub fn explainer_name(&self) -> Option<&'static str> {
        self.explainer.as_ref().ok().map(|e| e.name())
    }

    pub fn explainer(&self) -> ChurnResult<&dyn Explainer> {
        self.explainer
            .as_ref()
            .map(|e| e.as_ref())
            .map_err(|reason| ChurnError::explainer_unavailable(reason.clone()))
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub fn validate(&self, raw: &RawRecord) -> ChurnResult<CustomerRecord> {
        CustomerRecord::from_raw(raw)
    }

    pub fn predict(&self, record: &CustomerRecord) -> ChurnResult<PredictionResult> {
        let mut results = self.predict_batch(std::slice::from_ref(record))?;
        results
            .pop()
            .ok_or_else(|| ChurnError::schema("pipeline returned no rows"))
    }

    pub fn predict_batch(&self, records: &[CustomerRecord]) -> ChurnResult<Vec<PredictionResult>> {
        let start = Instant::now();
        let pipeline = &self.model.pipeline;
        let threshold = pipeline.threshold();
        let margins = pipeline.decision_function(records)?;
        let proba = pipeline.predict_proba(records)?;
        let elapsed = start.elapsed().as_micros() as u64;

        let results: Vec<PredictionResult> = margins
            .iter()
            .zip(proba.column(1).iter())
            .map(|(margin, p)| PredictionResult {
                label: ChurnLabel::from_class(threshold.is_churn(*p) as u8),
                probability: *p,
                margin: *margin,
                threshold: threshold.get(),
                inference_time_us: elapsed,
            })
            .collect();

        log::debug!("Predicted {} record(s) in {}us", results.len(), elapsed);
        Ok(results)
    }

    /// Attribution for one record, reconciled against the classifier margin.
    ///
    /// A reconciliation failure is logged and the attribution still returned.
    pub fn explain(&self, record: &CustomerRecord) -> ChurnResult<AttributionResult> {
        let explainer = self.explainer()?;
        let pipeline = &self.model.pipeline;
        let features = pipeline.transform(std::slice::from_ref(record))?;
        let row = features.row(0);

        let result = explainer.explain_row(row, pipeline.feature_names());
        let margin = pipeline.classifier().decision_function(row);
        if let Err(e) = verify(&result, margin, self.config.reconcile_epsilon) {
            log::warn!("Attribution does not reconcile: {}", e);
        }
        Ok(result)
    }

    /// Predict, then explain if possible
    pub fn assess(&self, record: &CustomerRecord) -> ChurnResult<Assessment> {
        let prediction = self.predict(record)?;

        let (attribution, explanation_note) = match self.explain(record) {
            Ok(attribution) => (Some(attribution), None),
            Err(ChurnError::ExplainerUnavailable(reason)) => (None, Some(reason)),
            Err(e) => return Err(e),
        };

        Ok(Assessment {
            prediction,
            attribution,
            explanation_note,
        })
    }

    /// Validate raw form values, then assess. Invalid input never reaches the model.
    pub fn assess_raw(&self, raw: &RawRecord) -> ChurnResult<Assessment> {
        let record = self.validate(raw)?;
        self.assess(&record)
    }

    /// Assess and append the probability to the session history
    pub fn assess_in_session(
        &self,
        record: &CustomerRecord,
        history: &mut SessionHistory,
    ) -> ChurnResult<Assessment> {
        let assessment = self.assess(record)?;
        history.record(&assessment.prediction);
        Ok(assessment)
    }
}
