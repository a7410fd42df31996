//! Model Module - Pipeline Loading & Inference
//!
//! Tách artifact loading khỏi inference logic.
//! - `artifact` - load + checksum + schema assertion
//! - `preprocess` - column transforms (one-hot, standardize, passthrough)
//! - `classifier` - logistic regression, gradient boosted trees
//! - `pipeline` - preprocessing + classifier with predict / predict_proba
//! - `threshold` - decision threshold shared by label and probability

pub mod artifact;
pub mod classifier;
pub mod inference;
pub mod pipeline;
pub mod preprocess;
pub mod threshold;


// Re-export common types
pub use artifact::{load_model, load_model_from_bytes, LoadedModel, ModelArtifact, ModelMetadata};
pub use classifier::Classifier;
pub use inference::{ChurnLabel, PredictionResult};
pub use pipeline::{Pipeline, PipelineSpec};
pub use threshold::DecisionThreshold;
