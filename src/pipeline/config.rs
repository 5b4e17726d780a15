//! Pipeline configuration

use crate::preprocessing::Preprocessor;
use crate::training::{ModelSelector, CLASSIFICATION_THRESHOLD, LARGE_DATASET_ROWS, SMALL_DATASET_ROWS};
use serde::{Deserialize, Serialize};

/// Fixed defaults of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum number of complete rows required after cleaning
    pub min_rows: usize,
    /// Numeric targets with fewer distinct values than this are classification
    pub classification_threshold: usize,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the split and every seeded model
    pub random_state: u64,
    /// Trees per random forest
    pub n_estimators: usize,
    /// Training rows below which random forests are used
    pub small_dataset_rows: usize,
    /// Training rows from which support-vector models are used
    pub large_dataset_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_rows: 10,
            classification_threshold: CLASSIFICATION_THRESHOLD,
            test_size: 0.2,
            random_state: 42,
            n_estimators: 100,
            small_dataset_rows: SMALL_DATASET_ROWS,
            large_dataset_rows: LARGE_DATASET_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.min_rows)
    }

    pub fn selector(&self) -> ModelSelector {
        ModelSelector::new(self.small_dataset_rows, self.large_dataset_rows)
    }
}
