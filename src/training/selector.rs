//! Heuristic model selection
//!
//! The "selection" is a static lookup keyed by problem type and the size band of
//! the training split. No candidate is fitted or scored.

use super::linear_models::{LinearRegression, LogisticRegression};
use super::models::TrainedModel;
use super::problem::ProblemType;
use super::random_forest::RandomForest;
use super::svm::{SVMClassifier, SVMConfig, SVMRegressor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (exclusive) of the small band
pub const SMALL_DATASET_ROWS: usize = 1_000;
/// Upper bound (exclusive) of the medium band
pub const LARGE_DATASET_ROWS: usize = 10_000;

/// Training-set size band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeBand {
    Small,
    Medium,
    Large,
}

/// The fixed model catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    RandomForestClassifier,
    LogisticRegression,
    SupportVectorClassifier,
    RandomForestRegressor,
    LinearRegression,
    SupportVectorRegressor,
}

impl ModelKind {
    /// Name of the concrete algorithm, as reported by model info
    pub fn class_name(&self) -> &'static str {
        match self {
            ModelKind::RandomForestClassifier => "RandomForestClassifier",
            ModelKind::LogisticRegression => "LogisticRegression",
            ModelKind::SupportVectorClassifier => "SVC",
            ModelKind::RandomForestRegressor => "RandomForestRegressor",
            ModelKind::LinearRegression => "LinearRegression",
            ModelKind::SupportVectorRegressor => "SVR",
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        match self {
            ModelKind::RandomForestClassifier
            | ModelKind::LogisticRegression
            | ModelKind::SupportVectorClassifier => ProblemType::Classification,
            ModelKind::RandomForestRegressor
            | ModelKind::LinearRegression
            | ModelKind::SupportVectorRegressor => ProblemType::Regression,
        }
    }

    /// Unfitted model with the catalog's fixed defaults
    pub fn build(&self, n_estimators: usize, random_state: u64) -> TrainedModel {
        match self {
            ModelKind::RandomForestClassifier => TrainedModel::RandomForestClassifier(
                RandomForest::new_classifier(n_estimators).with_random_state(random_state),
            ),
            ModelKind::RandomForestRegressor => TrainedModel::RandomForestRegressor(
                RandomForest::new_regressor(n_estimators).with_random_state(random_state),
            ),
            ModelKind::LogisticRegression => TrainedModel::LogisticRegression(LogisticRegression::new()),
            ModelKind::LinearRegression => TrainedModel::LinearRegression(LinearRegression::new()),
            ModelKind::SupportVectorClassifier => TrainedModel::SVMClassifier(SVMClassifier::new(SVMConfig {
                random_state,
                ..Default::default()
            })),
            ModelKind::SupportVectorRegressor => TrainedModel::SVMRegressor(SVMRegressor::new(SVMConfig {
                random_state,
                ..Default::default()
            })),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Picks a [`ModelKind`] from the training-set row count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSelector {
    pub small_rows: usize,
    pub large_rows: usize,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            small_rows: SMALL_DATASET_ROWS,
            large_rows: LARGE_DATASET_ROWS,
        }
    }
}

impl ModelSelector {
    pub fn new(small_rows: usize, large_rows: usize) -> Self {
        Self { small_rows, large_rows }
    }

    pub fn size_band(&self, n_train: usize) -> SizeBand {
        if n_train < self.small_rows {
            SizeBand::Small
        } else if n_train < self.large_rows {
            SizeBand::Medium
        } else {
            SizeBand::Large
        }
    }

    pub fn select(&self, problem_type: ProblemType, n_train: usize) -> ModelKind {
        match (problem_type, self.size_band(n_train)) {
            (ProblemType::Classification, SizeBand::Small) => ModelKind::RandomForestClassifier,
            (ProblemType::Classification, SizeBand::Medium) => ModelKind::LogisticRegression,
            (ProblemType::Classification, SizeBand::Large) => ModelKind::SupportVectorClassifier,
            (ProblemType::Regression, SizeBand::Small) => ModelKind::RandomForestRegressor,
            (ProblemType::Regression, SizeBand::Medium) => ModelKind::LinearRegression,
            (ProblemType::Regression, SizeBand::Large) => ModelKind::SupportVectorRegressor,
        }
    }
}
