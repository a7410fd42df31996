//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults and the
//! environment variables that override them.

use std::time::Duration;

/// Default model artifact path
pub const DEFAULT_MODEL_PATH: &str = "churn_model.json";

/// Default number of contributions shown before the remainder
pub const DEFAULT_TOP_K: usize = 10;

/// Default tolerance for baseline + sum(contributions) vs margin
pub const DEFAULT_RECONCILE_EPSILON: f64 = 1e-6;

/// Idle time after which a session is evicted (30 minutes)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Live sessions kept before the least recently used is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Churn Predictor";

pub const ENV_MODEL_PATH: &str = "CHURN_MODEL_PATH";
pub const ENV_MODEL_SHA256: &str = "CHURN_MODEL_SHA256";
pub const ENV_TOP_K: &str = "CHURN_TOP_K";
pub const ENV_EXPLAIN: &str = "CHURN_EXPLAIN";
pub const ENV_RECONCILE_EPSILON: &str = "CHURN_RECONCILE_EPSILON";
pub const ENV_HISTORY_LIMIT: &str = "CHURN_HISTORY_LIMIT";
pub const ENV_SESSION_TTL_SECS: &str = "CHURN_SESSION_TTL_SECS";
pub const ENV_MAX_SESSIONS: &str = "CHURN_MAX_SESSIONS";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var(ENV_MODEL_PATH).unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Expected artifact SHA-256, if pinned
pub fn get_model_sha256() -> Option<String> {
    std::env::var(ENV_MODEL_SHA256)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Get top-K from environment or use default
pub fn get_top_k() -> usize {
    std::env::var(ENV_TOP_K)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TOP_K)
}

/// Check if explanations are enabled
pub fn is_explain_enabled() -> bool {
    std::env::var(ENV_EXPLAIN)
        .map(|s| parse_flag(&s))
        .unwrap_or(true)
}

/// Get reconciliation tolerance from environment or use default
pub fn get_reconcile_epsilon() -> f64 {
    std::env::var(ENV_RECONCILE_EPSILON)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|e: &f64| e.is_finite() && *e > 0.0)
        .unwrap_or(DEFAULT_RECONCILE_EPSILON)
}

/// Session history cap; unset or 0 means unbounded
pub fn get_history_limit() -> Option<usize> {
    std::env::var(ENV_HISTORY_LIMIT)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
}

/// Session idle TTL; 0 disables expiry
pub fn get_session_ttl() -> Option<Duration> {
    let secs = std::env::var(ENV_SESSION_TTL_SECS)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_SECS);
    session_ttl(secs)
}

/// Session cap; 0 means unbounded
pub fn get_max_sessions() -> Option<usize> {
    let max = std::env::var(ENV_MAX_SESSIONS)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_SESSIONS);
    (max > 0).then_some(max)
}

pub fn session_ttl(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Anything but `false`/`0`/`off`/`no` counts as enabled
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}
