//! Record Module - Input Table Schema & Validation
//!
//! - `layout` - column order, kinds and layout hash
//! - `domain` - categorical enumerations accepted by the form
//! - `record` - `CustomerRecord` and central validation

pub mod layout;
pub mod domain;
pub mod record;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{ColumnKind, LayoutInfo, COLUMN_COUNT, LAYOUT_VERSION, RECORD_LAYOUT};
pub use record::{ColumnValue, CustomerRecord, RawRecord};
