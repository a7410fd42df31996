//! Churn Core - churn inference & explanation
//!
//! Validation -> Prediction -> Explanation over a model artifact loaded once
//! at startup, plus the presentation core shared by the CLI and the web
//! server.

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::config::ServiceConfig;
pub use logic::context::{Assessment, InferenceContext};
pub use logic::error::{ChurnError, ChurnResult};
