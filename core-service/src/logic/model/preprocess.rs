//! Preprocessor - column transform step of the pipeline
//!
//! Turns the single-row (or multi-row) input table into the numeric feature
//! matrix consumed by the classifier and the explainer. Transforms are
//! applied in artifact order and their outputs are concatenated.

use ndarray::{Array2, ArrayViewMut1};
use serde::{Deserialize, Serialize};

use crate::logic::error::{ChurnError, ChurnResult};
use crate::logic::record::layout::{column_index, COLUMN_KINDS};
use crate::logic::record::{ColumnValue, CustomerRecord};

// ============================================================================
// TRANSFORM SPEC (artifact form)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// One indicator per category; unknown labels encode as all zeros
    OneHot { column: String, categories: Vec<String> },
    /// (x - mean) / scale; a zero scale is treated as 1
    Standardize { column: String, mean: f64, scale: f64 },
    /// Numeric value as-is
    Passthrough { column: String },
}

impl ColumnTransform {
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::OneHot { column, .. }
            | ColumnTransform::Standardize { column, .. }
            | ColumnTransform::Passthrough { column } => column,
        }
    }

    /// Number of output features
    pub fn width(&self) -> usize {
        match self {
            ColumnTransform::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }

    /// Output feature names (`column_category` for one-hot, `column` otherwise)
    pub fn output_names(&self) -> Vec<String> {
        match self {
            ColumnTransform::OneHot { column, categories } => categories
                .iter()
                .map(|c| format!("{}_{}", column, c))
                .collect(),
            ColumnTransform::Standardize { column, .. } | ColumnTransform::Passthrough { column } => {
                vec![column.clone()]
            }
        }
    }

    /// Resolve the input column and check it suits this transform
    fn resolve(&self) -> ChurnResult<usize> {
        let column = self.column();
        let index = column_index(column).ok_or_else(|| {
            ChurnError::schema(format!("preprocessor expects unknown column '{}'", column))
        })?;
        let kind = COLUMN_KINDS[index];

        match self {
            ColumnTransform::OneHot { categories, .. } => {
                if !kind.is_categorical() {
                    return Err(ChurnError::schema(format!(
                        "one_hot on non-categorical column '{}'",
                        column
                    )));
                }
                if categories.is_empty() {
                    return Err(ChurnError::schema(format!(
                        "one_hot on '{}' has no categories",
                        column
                    )));
                }
                for (i, category) in categories.iter().enumerate() {
                    if categories[..i].contains(category) {
                        return Err(ChurnError::schema(format!(
                            "one_hot on '{}' repeats category '{}'",
                            column, category
                        )));
                    }
                }
            }
            ColumnTransform::Standardize { mean, scale, .. } => {
                if !kind.is_numeric() {
                    return Err(ChurnError::schema(format!(
                        "standardize on non-numeric column '{}'",
                        column
                    )));
                }
                if !mean.is_finite() || !scale.is_finite() {
                    return Err(ChurnError::schema(format!(
                        "standardize on '{}' has non-finite parameters",
                        column
                    )));
                }
            }
            ColumnTransform::Passthrough { .. } => {
                if !kind.is_numeric() {
                    return Err(ChurnError::schema(format!(
                        "passthrough on non-numeric column '{}'",
                        column
                    )));
                }
            }
        }

        Ok(index)
    }

    fn write(&self, value: ColumnValue, mut out: ArrayViewMut1<'_, f64>) -> ChurnResult<()> {
        match self {
            ColumnTransform::OneHot { column, categories } => {
                let label = value.as_label().ok_or_else(|| {
                    ChurnError::schema(format!("column '{}' has no category label", column))
                })?;
                out.fill(0.0);
                match categories.iter().position(|c| c == label) {
                    Some(hot) => out[hot] = 1.0,
                    None => log::debug!("Unknown category '{}' for '{}', encoding as zeros", label, column),
                }
            }
            ColumnTransform::Standardize { column, mean, scale } => {
                let x = value.as_number().ok_or_else(|| {
                    ChurnError::schema(format!("column '{}' is not numeric", column))
                })?;
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                out[0] = (x - mean) / scale;
            }
            ColumnTransform::Passthrough { column } => {
                out[0] = value.as_number().ok_or_else(|| {
                    ChurnError::schema(format!("column '{}' is not numeric", column))
                })?;
            }
        }
        Ok(())
    }
}

/// Artifact form of the preprocessing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorSpec {
    pub transforms: Vec<ColumnTransform>,
}

// ============================================================================
// COMPILED PREPROCESSOR
// ============================================================================

/// Validated preprocessing step with resolved column indices
#[derive(Debug, Clone)]
pub struct Preprocessor {
    steps: Vec<(usize, ColumnTransform)>,
    width: usize,
}

impl Preprocessor {
    /// Validate every transform against the record layout
    pub fn from_spec(spec: PreprocessorSpec) -> ChurnResult<Self> {
        if spec.transforms.is_empty() {
            return Err(ChurnError::schema("preprocessor has no transforms"));
        }

        let mut steps: Vec<(usize, ColumnTransform)> = Vec::with_capacity(spec.transforms.len());
        for transform in spec.transforms {
            let index = transform.resolve()?;
            if steps.iter().any(|(seen, _)| *seen == index) {
                return Err(ChurnError::schema(format!(
                    "column '{}' is transformed twice",
                    transform.column()
                )));
            }
            steps.push((index, transform));
        }

        let width = steps.iter().map(|(_, t)| t.width()).sum();
        Ok(Self { steps, width })
    }

    /// Number of transformed features
    pub fn width(&self) -> usize {
        self.width
    }

    /// Layout indices of the consumed columns, in transform order
    pub fn input_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().map(|(index, _)| *index)
    }

    /// Generated names of the transformed features
    pub fn output_names(&self) -> Vec<String> {
        self.steps.iter().flat_map(|(_, t)| t.output_names()).collect()
    }

    /// Transform a table into an `n_rows x width` feature matrix
    pub fn transform(&self, table: &[CustomerRecord]) -> ChurnResult<Array2<f64>> {
        let mut matrix = Array2::<f64>::zeros((table.len(), self.width));

        for (row, record) in table.iter().enumerate() {
            let mut offset = 0;
            for (index, transform) in &self.steps {
                let span = transform.width();
                let out = matrix.slice_mut(ndarray::s![row, offset..offset + span]);
                transform.write(record.value_at(*index), out)?;
                offset += span;
            }
        }

        Ok(matrix)
    }
}
