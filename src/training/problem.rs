//! Problem-type inference

use crate::data::Label;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of distinct target values from which a numeric target is
/// treated as continuous
pub const CLASSIFICATION_THRESHOLD: usize = 10;

/// Kind of supervised task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Classification,
    Regression,
}

impl ProblemType {
    /// Heuristic task inference.
    ///
    /// Any text label means classification. Otherwise a target with fewer than
    /// `threshold` distinct values is classification and everything else is
    /// regression: 9 distinct integers are always classes, 10 distinct small
    /// integers are always treated as continuous.
    pub fn infer(target: &[Label], threshold: usize) -> Self {
        if target.iter().any(Label::is_text) {
            return ProblemType::Classification;
        }

        let mut values: Vec<f64> = target
            .iter()
            .filter_map(|label| match label {
                Label::Number(v) => Some(*v + 0.0),
                Label::Text(_) => None,
            })
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup_by(|a, b| a.total_cmp(b).is_eq());

        if values.len() < threshold {
            ProblemType::Classification
        } else {
            ProblemType::Regression
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Classification => "classification",
            ProblemType::Regression => "regression",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
