//! Pipeline orchestration
//!
//! [`Pipeline`] ties the loader, preprocessor, problem-type inference, model
//! selector and catalog models together and owns the published model state.

mod config;
mod engine;
mod snapshot;

pub use config::PipelineConfig;
pub use engine::Pipeline;
pub use snapshot::{ModelInfo, PredictionOutput, TrainedPipeline};
