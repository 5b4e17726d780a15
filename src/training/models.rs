//! Estimator trait and the closed set of catalog models

use super::linear_models::{LinearRegression, LogisticRegression};
use super::random_forest::RandomForest;
use super::selector::ModelKind;
use super::svm::{SVMClassifier, SVMRegressor};
use crate::error::Result;
use ndarray::{Array1, Array2};

/// The `fit(X, y) / predict(X)` capability every catalog model offers.
///
/// Classification estimators take and return class indices as `f64`.
pub trait Estimator: Send + Sync {
    /// Fit the model to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Make predictions
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

impl Estimator for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        RandomForest::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        RandomForest::predict(self, x)
    }
}

impl Estimator for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        LinearRegression::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LinearRegression::predict(self, x)
    }
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        LogisticRegression::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        LogisticRegression::predict(self, x)
    }
}

impl Estimator for SVMClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        SVMClassifier::fit(self, x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        SVMClassifier::predict(self, x)
    }
}

impl Estimator for SVMRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        SVMRegressor::fit(self, x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        SVMRegressor::predict(self, x)
    }
}

/// A catalog model, fitted or not
#[derive(Debug, Clone)]
pub enum TrainedModel {
    RandomForestClassifier(RandomForest),
    LogisticRegression(LogisticRegression),
    SVMClassifier(SVMClassifier),
    RandomForestRegressor(RandomForest),
    LinearRegression(LinearRegression),
    SVMRegressor(SVMRegressor),
}

impl TrainedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            TrainedModel::RandomForestClassifier(_) => ModelKind::RandomForestClassifier,
            TrainedModel::LogisticRegression(_) => ModelKind::LogisticRegression,
            TrainedModel::SVMClassifier(_) => ModelKind::SupportVectorClassifier,
            TrainedModel::RandomForestRegressor(_) => ModelKind::RandomForestRegressor,
            TrainedModel::LinearRegression(_) => ModelKind::LinearRegression,
            TrainedModel::SVMRegressor(_) => ModelKind::SupportVectorRegressor,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.kind().class_name()
    }

    fn estimator(&self) -> &dyn Estimator {
        match self {
            TrainedModel::RandomForestClassifier(m) | TrainedModel::RandomForestRegressor(m) => m,
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::SVMClassifier(m) => m,
            TrainedModel::LinearRegression(m) => m,
            TrainedModel::SVMRegressor(m) => m,
        }
    }

    fn estimator_mut(&mut self) -> &mut dyn Estimator {
        match self {
            TrainedModel::RandomForestClassifier(m) | TrainedModel::RandomForestRegressor(m) => m,
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::SVMClassifier(m) => m,
            TrainedModel::LinearRegression(m) => m,
            TrainedModel::SVMRegressor(m) => m,
        }
    }
}

impl Estimator for TrainedModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.estimator_mut().fit(x, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.estimator().predict(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dispatch_through_estimator() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];

        let mut model = ModelKind::LinearRegression.build(100, 42);
        model.fit(&x, &y).unwrap();

        let prediction = model.predict(&array![[5.0]]).unwrap();
        assert!((prediction[0] - 11.0).abs() < 1e-8);
        assert_eq!(model.class_name(), "LinearRegression");
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let model = ModelKind::RandomForestClassifier.build(5, 42);
        assert!(model.predict(&array![[1.0]]).is_err());
    }
}
