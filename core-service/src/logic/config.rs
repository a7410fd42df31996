use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::constants;

/// Inference service settings, read once at startup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub model_sha256: Option<String>,
    pub top_k: usize,
    pub explain_enabled: bool,
    pub reconcile_epsilon: f64,
    pub history_limit: Option<usize>,
    pub session_ttl: Option<Duration>,
    pub max_sessions: Option<usize>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            model_path: PathBuf::from(constants::get_model_path()),
            model_sha256: constants::get_model_sha256(),
            top_k: constants::get_top_k(),
            explain_enabled: constants::is_explain_enabled(),
            reconcile_epsilon: constants::get_reconcile_epsilon(),
            history_limit: constants::get_history_limit(),
            session_ttl: constants::get_session_ttl(),
            max_sessions: constants::get_max_sessions(),
        }
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_explain(mut self, enabled: bool) -> Self {
        self.explain_enabled = enabled;
        self
    }

    pub fn with_sessions(mut self, ttl: Option<Duration>, max_sessions: Option<usize>) -> Self {
        self.session_ttl = ttl;
        self.max_sessions = max_sessions;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            model_sha256: None,
            top_k: constants::DEFAULT_TOP_K,
            explain_enabled: true,
            reconcile_epsilon: constants::DEFAULT_RECONCILE_EPSILON,
            history_limit: None,
            session_ttl: constants::session_ttl(constants::DEFAULT_SESSION_TTL_SECS),
            max_sessions: Some(constants::DEFAULT_MAX_SESSIONS),
        }
    }
}
