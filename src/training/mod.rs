//! Model training module
//!
//! Provides problem-type inference, the heuristic model selector and the fixed
//! model catalog:
//! - Random Forests (classification and regression)
//! - Linear and logistic regression
//! - Linear Support Vector Machines

mod metrics;
mod models;
mod problem;
mod selector;
mod split;
pub mod decision_tree;
pub mod linear_models;
pub mod random_forest;
pub mod svm;

pub use decision_tree::{Criterion, DecisionTree, TreeNode};
pub use linear_models::{LinearRegression, LogisticRegression};
pub use metrics::{accuracy, mean_squared_error, r2_score, Metrics};
pub use models::{Estimator, TrainedModel};
pub use problem::{ProblemType, CLASSIFICATION_THRESHOLD};
pub use random_forest::{MaxFeatures, RandomForest};
pub use selector::{ModelKind, ModelSelector, SizeBand, LARGE_DATASET_ROWS, SMALL_DATASET_ROWS};
pub use split::{split_indices, train_test_split, Split};
pub use svm::{SVMClassifier, SVMConfig, SVMRegressor};
