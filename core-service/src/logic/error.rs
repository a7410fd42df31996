//! Error taxonomy for the inference core.
//!
//! Every failure the service can report maps to exactly one variant. The
//! machine code returned by [`ChurnError::code`] is stable and is what the
//! presentation layers expose to clients.

use thiserror::Error;

pub type ChurnResult<T> = Result<T, ChurnError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChurnError {
    /// Missing or out-of-domain form field. No inference was attempted.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Artifact missing, unreadable, corrupt or failing its checksum.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Record shape disagrees with what the pipeline expects.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No explainer can be built for the loaded classifier.
    #[error("explainer unavailable: {0}")]
    ExplainerUnavailable(String),

    /// baseline + sum(contributions) does not reproduce the model output.
    #[error(
        "explanation mismatch: model output {expected:.9}, reconstructed {reconstructed:.9} (tolerance {tolerance:e})"
    )]
    ExplanationMismatch {
        expected: f64,
        reconstructed: f64,
        tolerance: f64,
    },
}

impl ChurnError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ChurnError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        ChurnError::ModelUnavailable(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        ChurnError::SchemaMismatch(msg.into())
    }

    pub fn explainer_unavailable(msg: impl Into<String>) -> Self {
        ChurnError::ExplainerUnavailable(msg.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ChurnError::InvalidInput { .. } => "invalid_input",
            ChurnError::ModelUnavailable(_) => "model_unavailable",
            ChurnError::SchemaMismatch(_) => "schema_mismatch",
            ChurnError::ExplainerUnavailable(_) => "explainer_unavailable",
            ChurnError::ExplanationMismatch { .. } => "explanation_mismatch",
        }
    }

    /// The user can fix this by editing the form and resubmitting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChurnError::InvalidInput { .. })
    }
}
