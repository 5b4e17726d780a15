//! Feature standardization

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Standard scaling (z-score normalization): `(x - mean) / std`.
///
/// Statistics are population mean and variance captured by [`fit`](Self::fit);
/// a zero-variance feature keeps a scale of 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(Array1::len)
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    /// Fit to the data
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::Data("cannot fit a scaler on zero rows".to_string()))?;
        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|v| if v > 0.0 { v.sqrt() } else { 1.0 });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(self)
    }

    /// Transform with the fitted statistics
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => (mean, scale),
            _ => return Err(PipelineError::Model("scaler is not fitted".to_string())),
        };

        if x.ncols() != mean.len() {
            return Err(PipelineError::Shape {
                expected: format!("{} features", mean.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok((&x - mean) / scale)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x.view())
    }
}
