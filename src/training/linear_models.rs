//! Linear model implementations

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Solve the symmetric positive-definite system `A x = b` by Cholesky decomposition.
///
/// Returns `None` when `A` is not numerically positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    // A = L * L^T
    let mut l = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 1e-12 * a[[i, i]].abs() || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Cholesky solve, retrying with a growing diagonal jitter when the system is singular
/// (duplicated or constant features)
fn regularized_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    if let Some(x) = cholesky_solve(a, b) {
        return Some(x);
    }

    let n = a.nrows().max(1);
    let scale = (a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64).max(1.0);
    let mut jitter = 1e-10 * scale;
    for _ in 0..8 {
        let mut a_reg = a.clone();
        a_reg.diag_mut().mapv_inplace(|v| v + jitter);
        if let Some(x) = cholesky_solve(&a_reg, b) {
            debug!(jitter, "Normal equations solved with diagonal jitter");
            return Some(x);
        }
        jitter *= 100.0;
    }
    None
}

fn check_lengths(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(PipelineError::Shape {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(PipelineError::Data("cannot fit a linear model on zero samples".to_string()));
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

/// Ordinary least squares with intercept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit by solving the centred normal equations `XcᵀXc w = Xcᵀyc`
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::Data("cannot centre an empty matrix".to_string()))?;
        let y_mean = y.mean().unwrap_or(0.0);

        let x_centered = x - &x_mean.view().insert_axis(Axis(0));
        let y_centered = y - y_mean;

        let xtx = x_centered.t().dot(&x_centered);
        let xty = x_centered.t().dot(&y_centered);

        let coefficients = regularized_solve(&xtx, &xty)
            .ok_or_else(|| PipelineError::Model("normal equations are singular".to_string()))?;

        self.intercept = y_mean - coefficients.dot(&x_mean);
        self.coefficients = Some(coefficients);

        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| PipelineError::Model("linear regression is not fitted".to_string()))?;
        check_features(coefficients.len(), x)?;

        Ok(x.dot(coefficients) + self.intercept)
    }
}

/// Multinomial logistic regression fitted by full-batch gradient descent on the
/// L2-penalised cross-entropy.
///
/// Targets are class indices `0..n_classes`. The penalty strength follows the
/// `C` convention: `alpha = 1 / (C * n_samples)` on the mean loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Weights, `n_features x n_classes`
    pub coefficients: Option<Array2<f64>>,
    pub intercept: Option<Array1<f64>>,
    /// Inverse regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub learning_rate: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            c: 1.0,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
        }
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Row-wise softmax, shifted by the row maximum for stability
    fn softmax(mut z: Array2<f64>) -> Array2<f64> {
        for mut row in z.rows_mut() {
            let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|v| v / sum);
        }
        z
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;
        if y.iter().any(|&v| v < 0.0 || v.fract() != 0.0) {
            return Err(PipelineError::Model(
                "classification targets must be non-negative class indices".to_string(),
            ));
        }

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let n_classes = y.iter().fold(0usize, |acc, &v| acc.max(v as usize + 1));

        let mut one_hot = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, &class) in y.iter().enumerate() {
            one_hot[[i, class as usize]] = 1.0;
        }

        let alpha = 1.0 / (self.c * n_samples as f64);
        let lr = self.learning_rate;
        let mut weights = Array2::<f64>::zeros((n_features, n_classes));
        let mut bias = Array1::<f64>::zeros(n_classes);
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;
            let probabilities = Self::softmax(x.dot(&weights) + &bias);
            let errors = probabilities - &one_hot;

            let dw = x.t().dot(&errors) / n_samples as f64 + alpha * &weights;
            let db = errors
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(n_classes));

            let grad_norm = (dw.mapv(|v| v * v).sum() + db.mapv(|v| v * v).sum()).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights.scaled_add(-lr, &dw);
            bias.scaled_add(-lr, &db);
        }

        debug!(n_iter, n_classes, "Logistic regression fitted");

        self.coefficients = Some(weights);
        self.intercept = Some(bias);

        Ok(self)
    }

    /// Class probabilities, `n_samples x n_classes`
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (coefficients, intercept) = match (&self.coefficients, &self.intercept) {
            (Some(w), Some(b)) => (w, b),
            _ => return Err(PipelineError::Model("logistic regression is not fitted".to_string())),
        };
        check_features(coefficients.nrows(), x)?;

        Ok(Self::softmax(x.dot(coefficients) + intercept))
    }

    /// Most probable class index; the lowest index wins ties
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0usize, f64::NEG_INFINITY), |(best, best_p), (class, &p)| {
                        if p > best_p {
                            (class, p)
                        } else {
                            (best, best_p)
                        }
                    })
                    .0 as f64
            })
            .collect())
    }
}
