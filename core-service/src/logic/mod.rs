//! Logic Module - Inference & Explanation Engines
//!
//! - `record/` - input table schema & validation
//! - `model/` - artifact loading, preprocessing, classifiers
//! - `explain/` - additive feature attribution
//! - `session/` - per-session prediction history
//! - `context` - read-only inference context shared by all requests

pub mod config;
pub mod context;
pub mod error;

pub mod explain;
pub mod model;
pub mod record;
pub mod session;
