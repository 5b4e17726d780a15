//! Application state management

use crate::pipeline::Pipeline;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::ServerConfig;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: Arc<Pipeline>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: Arc<Pipeline>) -> Self {
        Self {
            config,
            pipeline,
            started_at: Utc::now(),
        }
    }
}
