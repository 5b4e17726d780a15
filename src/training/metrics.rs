//! Held-out evaluation metrics

use super::problem::ProblemType;
use serde::{Deserialize, Serialize};

/// Metrics reported by a training run.
///
/// For regression `accuracy` is `max(0, r2) * 100`, a percentage-style score kept
/// for compatibility with existing consumers of the training response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub model_type: ProblemType,
    pub features: Vec<String>,
    pub n_samples: usize,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r2: Option<f64>,
}

impl Metrics {
    /// Fraction of exact matches, in `[0, 1]`
    pub fn classification(y_true: &[f64], y_pred: &[f64], features: Vec<String>, n_samples: usize) -> Self {
        Self {
            accuracy: accuracy(y_true, y_pred),
            model_type: ProblemType::Classification,
            n_features: features.len(),
            features,
            n_samples,
            mse: None,
            r2: None,
        }
    }

    pub fn regression(y_true: &[f64], y_pred: &[f64], features: Vec<String>, n_samples: usize) -> Self {
        let r2 = r2_score(y_true, y_pred);
        Self {
            accuracy: r2.max(0.0) * 100.0,
            model_type: ProblemType::Regression,
            n_features: features.len(),
            features,
            n_samples,
            mse: Some(mean_squared_error(y_true, y_pred)),
            r2: Some(r2),
        }
    }
}

pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / y_true.len() as f64
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
