//! Data preprocessing module
//!
//! Provides the transforms shared between training and inference:
//! - Cleaning and per-column type coercion ([`Preprocessor`])
//! - Feature standardization ([`StandardScaler`])
//! - Target label encoding ([`LabelEncoder`])

mod cleaner;
mod encoder;
mod scaler;

pub use cleaner::Preprocessor;
pub use encoder::LabelEncoder;
pub use scaler::StandardScaler;

use crate::data::Label;
use crate::error::{PipelineError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Column data type decided once during cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Values of a cleaned column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    /// Integer codes into `levels` (sorted distinct strings)
    Categorical { codes: Vec<usize>, levels: Vec<String> },
}

/// A fully present, numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct CleanColumn {
    pub name: String,
    pub data: ColumnData,
}

impl CleanColumn {
    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Categorical { .. } => ColumnType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` as a model input
    pub fn value(&self, row: usize) -> f64 {
        match &self.data {
            ColumnData::Numeric(values) => values[row],
            ColumnData::Categorical { codes, .. } => codes[row] as f64,
        }
    }

    /// Values in their original domain, used when the column is a target
    pub fn labels(&self) -> Vec<Label> {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().map(|&v| Label::number(v)).collect(),
            ColumnData::Categorical { codes, levels } => codes
                .iter()
                .map(|&code| Label::Text(levels[code].clone()))
                .collect(),
        }
    }
}

/// Named feature columns as a row-major matrix
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub values: Array2<f64>,
}

/// Output of [`Preprocessor::clean`]
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    columns: Vec<CleanColumn>,
}

impl CleanedDataset {
    pub fn new(columns: Vec<CleanColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[CleanColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&CleanColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, CleanColumn::len)
    }

    /// Split into features (all but the last column) and the target (last column)
    pub fn split_target(&self) -> Result<(FeatureMatrix, Vec<Label>)> {
        let (target, features) = self.columns.split_last().ok_or_else(|| {
            PipelineError::Data("no columns left after cleaning".to_string())
        })?;
        if features.is_empty() {
            return Err(PipelineError::Data(format!(
                "need at least one feature column besides the target '{}'",
                target.name
            )));
        }

        let n_rows = self.n_rows();
        let values = Array2::from_shape_fn((n_rows, features.len()), |(r, c)| features[c].value(r));
        let names = features.iter().map(|c| c.name.clone()).collect();

        Ok((FeatureMatrix { names, values }, target.labels()))
    }
}
