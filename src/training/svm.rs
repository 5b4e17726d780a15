//! Support Vector Machine implementations
//!
//! Linear SVMs trained by stochastic sub-gradient descent on the primal objective
//! `λ/2 ||w||² + mean(loss)` with `λ = 1 / (C * n_samples)`. Memory is linear in
//! the number of samples. Step size follows `η_t = η0 / (1 + η0 λ t)` and the
//! returned weights are the average of the iterates over the second half of the
//! epochs.

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// SVM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SVMConfig {
    /// Regularization parameter (C)
    pub c: f64,
    /// Number of passes over the training data
    pub max_iter: usize,
    /// Initial step size
    pub learning_rate: f64,
    /// Epsilon for regression (SVR tube width)
    pub epsilon: f64,
    /// Seed for the per-epoch sample order
    pub random_state: u64,
}

impl Default for SVMConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 20,
            learning_rate: 0.1,
            epsilon: 0.1,
            random_state: 42,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Loss {
    Hinge,
    EpsilonInsensitive(f64),
}

impl Loss {
    /// Negative sub-gradient of the loss with respect to the decision value
    fn gradient(&self, target: f64, decision: f64) -> f64 {
        match *self {
            Loss::Hinge => {
                if target * decision < 1.0 {
                    target
                } else {
                    0.0
                }
            }
            Loss::EpsilonInsensitive(epsilon) => {
                let residual = target - decision;
                if residual > epsilon {
                    1.0
                } else if residual < -epsilon {
                    -1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// One linear decision function `w·x + b`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearSvm {
    weights: Array1<f64>,
    bias: f64,
}

impl LinearSvm {
    fn decision(&self, sample: ArrayView1<f64>) -> f64 {
        sample.dot(&self.weights) + self.bias
    }
}

fn sgd_train(x: &Array2<f64>, y: &Array1<f64>, config: &SVMConfig, loss: Loss) -> LinearSvm {
    let n_samples = x.nrows();
    let lambda = 1.0 / (config.c * n_samples as f64);
    let eta0 = config.learning_rate;
    let average_from = config.max_iter / 2;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.random_state);
    let mut order: Vec<usize> = (0..n_samples).collect();

    let mut weights = Array1::<f64>::zeros(x.ncols());
    let mut bias = 0.0;
    let mut avg_weights = weights.clone();
    let mut avg_bias = 0.0;
    let mut n_averaged = 0usize;
    let mut t = 0usize;

    for epoch in 0..config.max_iter {
        order.shuffle(&mut rng);
        for &i in &order {
            let eta = eta0 / (1.0 + eta0 * lambda * t as f64);
            let sample = x.row(i);
            let g = loss.gradient(y[i], sample.dot(&weights) + bias);

            weights *= (1.0 - eta * lambda).max(0.0);
            if g != 0.0 {
                weights.scaled_add(eta * g, &sample);
                bias += eta * g;
            }
            t += 1;

            if epoch >= average_from {
                n_averaged += 1;
                let k = n_averaged as f64;
                avg_weights.zip_mut_with(&weights, |a, &w| *a += (w - *a) / k);
                avg_bias += (bias - avg_bias) / k;
            }
        }
    }

    if n_averaged == 0 {
        return LinearSvm { weights, bias };
    }
    LinearSvm {
        weights: avg_weights,
        bias: avg_bias,
    }
}

fn check_fit_input(x: &Array2<f64>, y: &Array1<f64>, config: &SVMConfig) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(PipelineError::Shape {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(PipelineError::Data("cannot fit an SVM on zero samples".to_string()));
    }
    if config.c.is_nan() || config.c <= 0.0 {
        return Err(PipelineError::Model(format!("C must be positive, got {}", config.c)));
    }
    Ok(())
}

fn check_features(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(PipelineError::Shape {
            expected: format!("{} features", expected),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(())
}

/// Support Vector Classifier
///
/// Two classes use a single decision function; any other class count trains one
/// one-vs-rest function per class in parallel and predicts the highest score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SVMClassifier {
    config: SVMConfig,
    models: Vec<LinearSvm>,
    n_classes: usize,
}

impl SVMClassifier {
    pub fn new(config: SVMConfig) -> Self {
        Self {
            config,
            models: Vec::new(),
            n_classes: 0,
        }
    }

    /// Fit on class indices `0..n_classes`
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y, &self.config)?;
        for (i, &v) in y.iter().enumerate() {
            if v < 0.0 || v.fract() != 0.0 {
                return Err(PipelineError::Model(format!(
                    "SVM classifier requires class indices, but sample {} has label {}",
                    i, v
                )));
            }
        }

        let n_classes = y.iter().fold(0usize, |acc, &v| acc.max(v as usize + 1));

        self.models = if n_classes == 2 {
            let y_binary = y.mapv(|v| if v == 1.0 { 1.0 } else { -1.0 });
            vec![sgd_train(x, &y_binary, &self.config, Loss::Hinge)]
        } else {
            (0..n_classes)
                .into_par_iter()
                .map(|class| {
                    let y_binary = y.mapv(|v| if v as usize == class { 1.0 } else { -1.0 });
                    sgd_train(x, &y_binary, &self.config, Loss::Hinge)
                })
                .collect()
        };
        self.n_classes = n_classes;

        debug!(n_classes, n_samples = x.nrows(), "SVM classifier fitted");
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let first = self
            .models
            .first()
            .ok_or_else(|| PipelineError::Model("SVM classifier is not fitted".to_string()))?;
        check_features(first.weights.len(), x)?;

        let predictions = x
            .rows()
            .into_iter()
            .map(|sample| {
                if self.n_classes == 2 {
                    return if first.decision(sample) >= 0.0 { 1.0 } else { 0.0 };
                }
                self.models
                    .iter()
                    .enumerate()
                    .fold((0usize, f64::NEG_INFINITY), |(best, best_score), (class, model)| {
                        let score = model.decision(sample);
                        if score > best_score {
                            (class, score)
                        } else {
                            (best, best_score)
                        }
                    })
                    .0 as f64
            })
            .collect();

        Ok(predictions)
    }
}

/// Support Vector Regressor (epsilon-insensitive loss)
///
/// The target is standardized before SGD and predictions are mapped back, so the
/// step budget does not depend on the target's offset or magnitude. `epsilon` is
/// measured in target standard deviations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SVMRegressor {
    config: SVMConfig,
    model: Option<LinearSvm>,
    y_mean: f64,
    y_scale: f64,
}

impl SVMRegressor {
    pub fn new(config: SVMConfig) -> Self {
        Self {
            config,
            model: None,
            y_mean: 0.0,
            y_scale: 1.0,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y, &self.config)?;

        let y_mean = y.mean().unwrap_or(0.0);
        let y_std = y.std(0.0);
        let y_scale = if y_std > 0.0 && y_std.is_finite() { y_std } else { 1.0 };
        let z = y.mapv(|v| (v - y_mean) / y_scale);

        self.model = Some(sgd_train(
            x,
            &z,
            &self.config,
            Loss::EpsilonInsensitive(self.config.epsilon),
        ));
        self.y_mean = y_mean;
        self.y_scale = y_scale;
        debug!(n_samples = x.nrows(), y_mean, y_scale, "SVM regressor fitted");
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PipelineError::Model("SVM regressor is not fitted".to_string()))?;
        check_features(model.weights.len(), x)?;

        Ok((x.dot(&model.weights) + model.bias) * self.y_scale + self.y_mean)
    }
}
