//! API Module - presentation core
//!
//! One presentation core shared by the CLI and the HTTP server, configured
//! by a [`Layout`].
//!
//! Structure:
//! - form.rs: form descriptor (widgets, labels, defaults)
//! - view.rs: assessment view model
//! - render.rs: plain-text rendering

pub mod form;
pub mod render;
pub mod view;
#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use form::{FieldGroup, FormColumn, FormDescriptor, FormField, Widget};
pub use render::{render_assessment, render_form};
pub use view::{AssessmentView, ContributionView, Direction, ExplanationView};

/// Form arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Single,
    TwoColumn,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::TwoColumn => "two_column",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "one_column" | "one-column" => Ok(Layout::Single),
            "two_column" | "two-column" | "two" => Ok(Layout::TwoColumn),
            other => Err(format!(
                "unknown layout '{}', expected 'single' or 'two_column'",
                other
            )),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
