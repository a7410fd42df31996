//! Configuration module

use std::env;
use std::time::Duration;

use churn_core::api::Layout;
use churn_core::ServiceConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Default form layout
    pub layout: Layout,

    /// Budget for one explanation before the prediction is returned without it
    pub explain_timeout_ms: u64,

    /// Environment (development, production)
    pub environment: String,

    /// Inference core settings
    pub service: ServiceConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            layout: env::var("CHURN_LAYOUT")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or_default(),

            explain_timeout_ms: env::var("CHURN_EXPLAIN_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(2000),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            service: ServiceConfig::from_env(),
        }
    }

    pub fn explain_timeout(&self) -> Duration {
        Duration::from_millis(self.explain_timeout_ms)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            layout: Layout::Single,
            explain_timeout_ms: 2000,
            environment: "development".to_string(),
            service: ServiceConfig::default(),
        }
    }
}
