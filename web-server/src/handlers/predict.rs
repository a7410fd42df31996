//! Stateless prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use churn_core::api::AssessmentView;
use churn_core::logic::record::{CustomerRecord, RawRecord};
use churn_core::{Assessment, ChurnError};
use serde_json::Value;

use crate::{AppError, AppResult, AppState};

/// Turn the request body into a validated record; nothing reaches the model otherwise
pub(crate) fn parse_record(payload: Result<Json<Value>, JsonRejection>) -> AppResult<CustomerRecord> {
    let Json(value) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let raw: RawRecord = match value {
        Value::Object(map) => map,
        _ => return Err(ChurnError::invalid("record", "expected a JSON object").into()),
    };
    Ok(CustomerRecord::from_raw(&raw)?)
}

/// Predict on the blocking pool, then explain within the configured budget.
///
/// The prediction is returned even when the explanation is unavailable or
/// runs out of time.
pub(crate) async fn run_assessment(state: &AppState, record: CustomerRecord) -> AppResult<Assessment> {
    let ctx = state.ctx.clone();
    let input = record.clone();
    let prediction = tokio::task::spawn_blocking(move || ctx.predict(&input)).await??;

    let ctx = state.ctx.clone();
    let task = tokio::task::spawn_blocking(move || ctx.explain(&record));
    let (attribution, explanation_note) =
        match tokio::time::timeout(state.config.explain_timeout(), task).await {
            Ok(joined) => match joined? {
                Ok(attribution) => (Some(attribution), None),
                Err(ChurnError::ExplainerUnavailable(reason)) => (None, Some(reason)),
                Err(e) => return Err(e.into()),
            },
            Err(_) => {
                tracing::warn!(
                    "Explanation exceeded {}ms, returning prediction only",
                    state.config.explain_timeout_ms
                );
                (None, Some("explanation timed out".to_string()))
            }
        };

    tracing::debug!(
        probability = prediction.probability,
        label = prediction.label.as_str(),
        explained = attribution.is_some(),
        "Assessment complete"
    );

    Ok(Assessment {
        prediction,
        attribution,
        explanation_note,
    })
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<AssessmentView>> {
    let record = parse_record(payload)?;
    let assessment = run_assessment(&state, record).await?;
    Ok(Json(AssessmentView::new(&assessment, state.ctx.config().top_k)))
}
