//! Target label encoding

use crate::data::Label;
use crate::error::{PipelineError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Reversible mapping between target labels and class indices.
///
/// Classes are the sorted distinct labels; a label's code is its index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<Label>,
}

impl LabelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn fit(&mut self, labels: &[Label]) -> Result<&mut Self> {
        if labels.is_empty() {
            return Err(PipelineError::Data("cannot fit a label encoder on no labels".to_string()));
        }
        let mut classes: Vec<Label> = labels
            .iter()
            .map(|label| match label {
                Label::Number(v) => Label::number(*v),
                text => text.clone(),
            })
            .collect();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup_by(|a, b| a.total_cmp(b).is_eq());
        self.classes = classes;
        Ok(self)
    }

    pub fn transform(&self, labels: &[Label]) -> Result<Array1<f64>> {
        labels
            .iter()
            .map(|label| {
                self.classes
                    .binary_search_by(|class| class.total_cmp(label))
                    .map(|code| code as f64)
                    .map_err(|_| PipelineError::Data(format!("y contains previously unseen label: {}", label)))
            })
            .collect()
    }

    pub fn fit_transform(&mut self, labels: &[Label]) -> Result<Array1<f64>> {
        self.fit(labels)?;
        self.transform(labels)
    }

    /// Map class indices back to labels; codes must be integral and in range
    pub fn inverse_transform(&self, codes: &Array1<f64>) -> Result<Vec<Label>> {
        codes
            .iter()
            .map(|&code| {
                let valid = code.fract() == 0.0 && code >= 0.0 && (code as usize) < self.classes.len();
                if valid {
                    Ok(self.classes[code as usize].clone())
                } else {
                    Err(PipelineError::Data(format!("y contains previously unseen label code: {}", code)))
                }
            })
            .collect()
    }
}
