//! Raw tabular data
//!
//! A [`Dataset`] is what the CSV loader hands to the preprocessor: ordered, named
//! columns of raw text values where `None` marks a missing entry. Nothing here is
//! typed yet; numeric/categorical coercion happens in [`crate::preprocessing`].

mod loader;

pub use loader::{read_csv, MISSING_TOKENS};

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single named column of raw values
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// True if every entry is missing
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Ordered collection of equally long raw columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<RawColumn>,
}

impl Dataset {
    /// Build a dataset, checking that all columns have the same length
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let n_rows = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
                return Err(PipelineError::Parse(format!(
                    "column '{}' has {} values, expected {}",
                    bad.name,
                    bad.values.len(),
                    n_rows
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Parse CSV text (header row required)
    pub fn from_csv_str(text: &str) -> Result<Self> {
        read_csv(text)
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// A target value in its original domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(f64),
    Text(String),
}

impl Label {
    /// Numeric label with `-0.0` folded into `0.0`
    pub fn number(value: f64) -> Self {
        Label::Number(value + 0.0)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Label::Text(_))
    }

    /// Total order used for deterministic encoding: numbers (by `f64::total_cmp`,
    /// with `-0.0 == 0.0`) before text (lexicographic).
    pub fn total_cmp(&self, other: &Label) -> Ordering {
        match (self, other) {
            (Label::Number(a), Label::Number(b)) => (a + 0.0).total_cmp(&(b + 0.0)),
            (Label::Text(a), Label::Text(b)) => a.cmp(b),
            (Label::Number(_), Label::Text(_)) => Ordering::Less,
            (Label::Text(_), Label::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(v) => write!(f, "{}", v),
            Label::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One raw value of a feature row submitted for prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl FeatureValue {
    /// Strict numeric view of the value
    pub fn to_f64(&self) -> Result<f64> {
        match self {
            FeatureValue::Number(v) => Ok(*v),
            FeatureValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PipelineError::Data(format!("could not convert string to float: '{}'", s))),
            FeatureValue::Bool(b) => Err(PipelineError::Data(format!(
                "boolean feature value {} is not numeric",
                b
            ))),
            FeatureValue::Null => Err(PipelineError::Data(
                "missing feature value".to_string(),
            )),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}
