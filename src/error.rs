//! Error types for the pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed CSV input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Dataset unusable after cleaning (too few rows, no feature columns, ...)
    #[error("Data error: {0}")]
    Data(String),

    /// Any failure raised while training, wrapping the original cause
    #[error("Training failed: {0}")]
    Training(Box<PipelineError>),

    /// `predict` called before any successful `train`
    #[error("Model not trained yet")]
    NotTrained,

    /// Any failure raised while predicting, wrapping the original cause
    #[error("Prediction failed: {0}")]
    Prediction(Box<PipelineError>),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    /// Failure inside an estimator fit/predict
    #[error("Model error: {0}")]
    Model(String),
}

impl PipelineError {
    /// Wrap an error raised during training
    pub fn training(err: PipelineError) -> Self {
        PipelineError::Training(Box::new(err))
    }

    /// Wrap an error raised during prediction
    pub fn prediction(err: PipelineError) -> Self {
        PipelineError::Prediction(Box::new(err))
    }

    /// The innermost cause, with Training/Prediction wrappers removed
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::Training(inner) | PipelineError::Prediction(inner) => inner.root(),
            other => other,
        }
    }
}

impl From<polars::error::PolarsError> for PipelineError {
    fn from(err: polars::error::PolarsError) -> Self {
        PipelineError::Parse(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PipelineError {
    fn from(err: ndarray::ShapeError) -> Self {
        PipelineError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
