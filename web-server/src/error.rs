//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use churn_core::ChurnError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Churn(#[from] ChurnError),

    #[error("session {0} not found")]
    SessionNotFound(Uuid),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Churn(err) => match err {
                ChurnError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                ChurnError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ChurnError::SchemaMismatch(_)
                | ChurnError::ExplainerUnavailable(_)
                | ChurnError::ExplanationMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Churn(err) => err.code(),
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("{}", self);
            match &self {
                AppError::Churn(ChurnError::ModelUnavailable(_)) => "Model is not available".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("inference task failed: {}", err))
    }
}
