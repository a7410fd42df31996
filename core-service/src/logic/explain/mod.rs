//! Explain Module - Additive Feature Attribution
//!
//! Explains one prediction as per-feature contributions to the classifier
//! margin, so that `baseline + sum(contributions) == margin`.
//!
//! # Architecture
//! - `types.rs`: `AttributionResult`, `FeatureContribution`
//! - `engine.rs`: `Explainer` trait, `make_explainer`, ranking, reconciliation
//! - `tree_shap.rs`: path-dependent TreeSHAP for boosted trees

pub mod engine;
pub mod tree_shap;
pub mod types;
#[cfg(test)]
mod tests;

pub use engine::{make_explainer, rank, verify, Explainer, LinearExplainer, TreeExplainer};
pub use types::{AttributionResult, FeatureContribution, OutputSpace, TopContributions};
