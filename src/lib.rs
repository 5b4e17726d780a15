//! AutoML pipeline - automatic tabular model fitting
//!
//! Give it a CSV whose last column is the target; it cleans the data, decides
//! between classification and regression, picks a model by dataset size, fits
//! it on a seeded train split and scores it on the held-out rows. The fitted
//! pipeline then serves single-row predictions.
//!
//! # Modules
//!
//! - [`data`] - CSV loading into raw named columns
//! - [`preprocessing`] - cleaning, label encoding, standard scaling
//! - [`training`] - problem inference, model selection, estimators, metrics
//! - [`pipeline`] - train/predict orchestration over a published snapshot
//! - [`server`] - HTTP service
//! - [`cli`] - command-line interface

pub mod error;

pub mod data;
pub mod preprocessing;
pub mod training;
pub mod pipeline;

pub mod server;
pub mod cli;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{PipelineError, Result};

    pub use crate::data::{Dataset, FeatureValue, Label};

    pub use crate::preprocessing::{CleanedDataset, LabelEncoder, Preprocessor, StandardScaler};

    pub use crate::training::{
        Estimator, Metrics, ModelKind, ModelSelector, ProblemType, TrainedModel,
    };

    pub use crate::pipeline::{ModelInfo, Pipeline, PipelineConfig, PredictionOutput};

    pub use crate::server::{create_router, run_server, AppState, ServerConfig};
}
