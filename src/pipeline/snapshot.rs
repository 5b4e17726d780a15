//! Immutable result of a successful training run

use crate::data::{FeatureValue, Label};
use crate::error::{PipelineError, Result};
use crate::preprocessing::{LabelEncoder, StandardScaler};
use crate::training::{Estimator, Metrics, ProblemType, TrainedModel};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Everything needed to serve predictions: the fitted model and the transforms
/// fitted alongside it.
///
/// Published whole; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TrainedPipeline {
    pub model: TrainedModel,
    pub scaler: StandardScaler,
    /// Present for classification only
    pub label_encoder: Option<LabelEncoder>,
    pub problem_type: ProblemType,
    pub feature_names: Vec<String>,
    pub metrics: Metrics,
    pub trained_at: DateTime<Utc>,
}

/// Summary of the published model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: ProblemType,
    pub features: Vec<String>,
    pub model_class: String,
}

/// Predictions together with the problem type of the snapshot that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub predictions: Vec<Label>,
    pub model_type: ProblemType,
}

impl TrainedPipeline {
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.problem_type,
            features: self.feature_names.clone(),
            model_class: self.model.class_name().to_string(),
        }
    }

    /// Predict one feature row, bound positionally to `feature_names`
    pub fn predict(&self, features: &[FeatureValue]) -> Result<PredictionOutput> {
        if features.len() != self.feature_names.len() {
            return Err(PipelineError::Shape {
                expected: format!("{} features", self.feature_names.len()),
                actual: format!("{} features", features.len()),
            });
        }

        let row = features
            .iter()
            .zip(&self.feature_names)
            .map(|(value, name)| {
                value.to_f64().map_err(|err| match err {
                    PipelineError::Data(msg) => PipelineError::Data(format!("feature '{}': {}", name, msg)),
                    other => other,
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let x = Array2::from_shape_vec((1, row.len()), row)?;
        let x = self.scaler.transform(x.view())?;
        let raw = self.model.predict(&x)?;

        let predictions = match &self.label_encoder {
            Some(encoder) => encoder.inverse_transform(&raw)?,
            None => raw.iter().map(|&v| Label::number(v)).collect(),
        };

        Ok(PredictionOutput {
            predictions,
            model_type: self.problem_type,
        })
    }
}
