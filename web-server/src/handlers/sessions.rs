//! Session handlers - assessments with per-session history

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use churn_core::api::AssessmentView;
use churn_core::logic::session::HistoryEntry;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::predict::{parse_record, run_assessment};
use crate::{AppError, AppResult, AppState};

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub id: Uuid,
    pub probabilities: Vec<f64>,
    pub entries: Vec<HistoryEntry>,
}

/// Session id from the path; a malformed id gets the usual JSON error body
fn session_id(path: Result<Path<Uuid>, PathRejection>) -> AppResult<Uuid> {
    let Path(id) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(id)
}

/// Start a new session
pub async fn create(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.create();
    tracing::info!("Session {} started", session.id);
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// Assess and append the probability to the session history
pub async fn predict(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<AssessmentView>> {
    let id = session_id(path)?;
    let history = state.sessions.get(&id).ok_or(AppError::SessionNotFound(id))?;
    let record = parse_record(payload)?;
    let assessment = run_assessment(&state, record).await?;

    let view = {
        let mut history = history.lock();
        history.record(&assessment.prediction);
        AssessmentView::new(&assessment, state.ctx.config().top_k).with_history(&history)
    };
    Ok(Json(view))
}

/// History in insertion order
pub async fn history(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<HistoryResponse>> {
    let id = session_id(path)?;
    let history = state.sessions.get(&id).ok_or(AppError::SessionNotFound(id))?;
    let history = history.lock();
    Ok(Json(HistoryResponse {
        id,
        probabilities: history.probabilities(),
        entries: history.entries().to_vec(),
    }))
}

/// End a session and drop its history
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = session_id(path)?;
    if state.sessions.remove(&id) {
        tracing::info!("Session {} ended", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}
