//! Record Layout - Centralized Column Definition
//!
//! **CRITICAL: This file controls the input table schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add column → increment LAYOUT_VERSION
//! 2. Change order → increment LAYOUT_VERSION
//! 3. Remove column → increment LAYOUT_VERSION
//!
//! Model artifacts may pin the layout version they were trained against;
//! the pipeline refuses to load when it disagrees with this file.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current record layout version
/// MUST be incremented when layout changes
pub const LAYOUT_VERSION: u8 = 1;

// ============================================================================
// RECORD LAYOUT (Authoritative source)
// ============================================================================

/// Column names in the exact order of the single-row input table
pub const RECORD_LAYOUT: &[&str] = &[
    // === Customer (0-4) ===
    "gender",            // 0: Male | Female
    "seniorcitizen",     // 1: 0 | 1
    "partner",           // 2: Yes | No
    "dependents",        // 3: Yes | No
    "tenure",            // 4: months, 0..=72

    // === Phone (5-6) ===
    "phoneservice",      // 5: Yes | No
    "multiplelines",     // 6: Yes | No | No phone service

    // === Internet (7-13) ===
    "internetservice",   // 7: DSL | Fiber optic | No
    "onlinesecurity",    // 8
    "onlinebackup",      // 9
    "deviceprotection",  // 10
    "techsupport",       // 11
    "streamingtv",       // 12
    "streamingmovies",   // 13

    // === Account (14-18) ===
    "contract",          // 14: Month-to-month | One year | Two year
    "paperlessbilling",  // 15: Yes | No
    "paymentmethod",     // 16
    "monthlycharges",    // 17: >= 0
    "totalcharges",      // 18: >= 0
];

/// Total number of columns
/// IMPORTANT: Must match RECORD_LAYOUT.len()!
pub const COLUMN_COUNT: usize = 19;

/// How a column's values are represented in the input table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Fixed set of text labels
    Categorical,
    /// Integer flag that is both a category and a number (seniorcitizen)
    Flag,
    /// Integer count
    Integer,
    /// Real number
    Continuous,
}

impl ColumnKind {
    /// Column can be fed to a one-hot encoder
    pub fn is_categorical(self) -> bool {
        matches!(self, ColumnKind::Categorical | ColumnKind::Flag)
    }

    /// Column can be fed to a numeric transform
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Flag | ColumnKind::Integer | ColumnKind::Continuous)
    }
}

/// Kind of each column, by layout index
pub const COLUMN_KINDS: [ColumnKind; COLUMN_COUNT] = [
    ColumnKind::Categorical, // gender
    ColumnKind::Flag,        // seniorcitizen
    ColumnKind::Categorical, // partner
    ColumnKind::Categorical, // dependents
    ColumnKind::Integer,     // tenure
    ColumnKind::Categorical, // phoneservice
    ColumnKind::Categorical, // multiplelines
    ColumnKind::Categorical, // internetservice
    ColumnKind::Categorical, // onlinesecurity
    ColumnKind::Categorical, // onlinebackup
    ColumnKind::Categorical, // deviceprotection
    ColumnKind::Categorical, // techsupport
    ColumnKind::Categorical, // streamingtv
    ColumnKind::Categorical, // streamingmovies
    ColumnKind::Categorical, // contract
    ColumnKind::Categorical, // paperlessbilling
    ColumnKind::Categorical, // paymentmethod
    ColumnKind::Continuous,  // monthlycharges
    ColumnKind::Continuous,  // totalcharges
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the record layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[LAYOUT_VERSION]);

    for name in RECORD_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub column_count: usize,
    pub columns: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: LAYOUT_VERSION,
            hash: layout_hash(),
            column_count: COLUMN_COUNT,
            columns: RECORD_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// COLUMN LOOKUP
// ============================================================================

/// Get column index by name
pub fn column_index(name: &str) -> Option<usize> {
    RECORD_LAYOUT.iter().position(|&n| n == name)
}

/// Get column name by index
pub fn column_name(index: usize) -> Option<&'static str> {
    RECORD_LAYOUT.get(index).copied()
}

/// Get column kind by name
pub fn column_kind(name: &str) -> Option<ColumnKind> {
    column_index(name).map(|i| COLUMN_KINDS[i])
}

// ============================================================================
// TESTS
// ============================================================================
