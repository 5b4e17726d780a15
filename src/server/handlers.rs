//! HTTP request handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::data::FeatureValue;
use crate::error::PipelineError;
use crate::pipeline::{ModelInfo, PredictionOutput};

use super::error::{Result, ServerError};
use super::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ML Pipeline",
    }))
}

/// Train on an uploaded CSV file (multipart part named `file`)
pub async fn train(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(error = %rejection, "Request is not multipart");
        ServerError::BadRequest("No file provided".to_string())
    })?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(ServerError::BadRequest("No file selected".to_string()));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) = upload.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;
    info!(file = %file_name, bytes = data.len(), "Received training file");

    let csv = String::from_utf8(data.to_vec()).map_err(|_| {
        PipelineError::training(PipelineError::Parse(format!("'{}' is not valid UTF-8 text", file_name)))
    })?;

    let pipeline = Arc::clone(&state.pipeline);
    let metrics = tokio::task::spawn_blocking(move || pipeline.train(&csv))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(Json(json!({
        "message": "Model trained successfully",
        "metrics": metrics,
    })))
}

/// Predict one row from `{"features": [...]}`
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionOutput>> {
    let no_features = || ServerError::BadRequest("No features provided".to_string());

    let payload: Value = serde_json::from_slice(&body).map_err(|_| no_features())?;
    let features = payload.get("features").ok_or_else(no_features)?;

    let features: Vec<FeatureValue> = serde_json::from_value(features.clone()).map_err(|e| {
        PipelineError::prediction(PipelineError::Parse(format!(
            "features must be an array of numbers or strings: {}",
            e
        )))
    })?;

    let output = state.pipeline.predict_with_model_type(&features)?;
    Ok(Json(output))
}

pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<ModelInfo>> {
    state
        .pipeline
        .model_info()
        .map(Json)
        .ok_or_else(|| ServerError::BadRequest("No model trained".to_string()))
}
