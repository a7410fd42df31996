//! Model Artifact - loading, checksum & schema assertion
//!
//! The artifact is a single JSON file holding the pipeline and the
//! transformed feature names. Loading happens once at startup; any failure
//! to read, verify or parse it is `ModelUnavailable`, any disagreement with
//! the record layout is `SchemaMismatch`.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::pipeline::{Pipeline, PipelineSpec};
use crate::logic::error::{ChurnError, ChurnResult};
use crate::logic::record::layout::{column_name, layout_hash, LAYOUT_VERSION, RECORD_LAYOUT};

/// Artifact format understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Record layout version the pipeline was trained against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_version: Option<u8>,
    /// Input columns the pipeline was fitted on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_columns: Option<Vec<String>>,
    pub pipeline: PipelineSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub name: String,
    pub classifier: String,
    pub feature_count: usize,
    pub threshold: f64,
    pub sha256: String,
    pub layout_version: u8,
    pub layout_hash: u32,
    pub loaded_at: DateTime<Utc>,
}

/// Pipeline plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub pipeline: Pipeline,
    pub metadata: ModelMetadata,
}

// ============================================================================
// CHECKSUM
// ============================================================================

/// Lowercase hex SHA-256 of the artifact bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare against an expected hex digest (case-insensitive)
pub fn verify_checksum(bytes: &[u8], expected_hex: &str) -> bool {
    sha256_hex(bytes).eq_ignore_ascii_case(expected_hex.trim())
}

// ============================================================================
// LOADING
// ============================================================================

/// Load artifact from file
pub fn load_model(path: &Path, expected_sha256: Option<&str>) -> ChurnResult<LoadedModel> {
    log::info!("Loading churn model from: {}", path.display());

    if !path.exists() {
        return Err(ChurnError::model_unavailable(format!(
            "Model not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        ChurnError::model_unavailable(format!("Failed to read {}: {}", path.display(), e))
    })?;

    load_model_from_bytes(&bytes, &path.display().to_string(), expected_sha256)
}

/// Load artifact from bytes already in memory
pub fn load_model_from_bytes(
    bytes: &[u8],
    source: &str,
    expected_sha256: Option<&str>,
) -> ChurnResult<LoadedModel> {
    let sha256 = sha256_hex(bytes);

    if let Some(expected) = expected_sha256 {
        if !verify_checksum(bytes, expected) {
            return Err(ChurnError::model_unavailable(format!(
                "Checksum mismatch for {}: expected {}, got {}",
                source, expected, sha256
            )));
        }
        log::info!("Model checksum verified");
    }

    let artifact: ModelArtifact = serde_json::from_slice(bytes).map_err(|e| {
        ChurnError::model_unavailable(format!("Corrupt model artifact {}: {}", source, e))
    })?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ChurnError::model_unavailable(format!(
            "Unsupported artifact format v{} (expected v{})",
            artifact.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    check_layout(&artifact)?;

    let name = artifact.name.clone();
    let pipeline = Pipeline::from_spec(artifact.pipeline, artifact.feature_names)?;
    warn_unused_columns(&pipeline);

    let metadata = ModelMetadata {
        model_path: source.to_string(),
        name,
        classifier: pipeline.classifier().kind_name().to_string(),
        feature_count: pipeline.feature_names().len(),
        threshold: pipeline.threshold().get(),
        sha256,
        layout_version: LAYOUT_VERSION,
        layout_hash: layout_hash(),
        loaded_at: Utc::now(),
    };

    log::info!(
        "Model '{}' loaded: classifier={}, features={}, threshold={}",
        metadata.name,
        metadata.classifier,
        metadata.feature_count,
        metadata.threshold
    );

    Ok(LoadedModel { pipeline, metadata })
}

// ============================================================================
// SCHEMA ASSERTIONS
// ============================================================================

/// Artifact-declared layout must agree with the compiled-in record layout
fn check_layout(artifact: &ModelArtifact) -> ChurnResult<()> {
    if let Some(version) = artifact.layout_version {
        if version != LAYOUT_VERSION {
            return Err(ChurnError::schema(format!(
                "artifact built for record layout v{}, this build uses v{}",
                version, LAYOUT_VERSION
            )));
        }
    }

    if let Some(columns) = &artifact.input_columns {
        let declared: BTreeSet<&str> = columns.iter().map(|c| c.as_str()).collect();
        if declared.len() != columns.len() {
            return Err(ChurnError::schema("artifact input columns contain duplicates"));
        }

        let expected: BTreeSet<&str> = RECORD_LAYOUT.iter().copied().collect();
        let missing: Vec<&str> = expected.difference(&declared).copied().collect();
        let extra: Vec<&str> = declared.difference(&expected).copied().collect();
        if !missing.is_empty() || !extra.is_empty() {
            return Err(ChurnError::schema(format!(
                "input columns differ from record layout: missing {:?}, unexpected {:?}",
                missing, extra
            )));
        }
    }

    Ok(())
}

fn warn_unused_columns(pipeline: &Pipeline) {
    let used: BTreeSet<usize> = pipeline.processor().input_columns().collect();
    for index in 0..RECORD_LAYOUT.len() {
        if !used.contains(&index) {
            log::warn!(
                "Column '{}' is not consumed by the preprocessor and will be dropped",
                column_name(index).unwrap_or("?")
            );
        }
    }
}
