//! Train/predict orchestration over a single published model

use super::config::PipelineConfig;
use super::snapshot::{ModelInfo, PredictionOutput, TrainedPipeline};
use crate::data::{Dataset, FeatureValue, Label};
use crate::error::{PipelineError, Result};
use crate::preprocessing::{LabelEncoder, StandardScaler};
use crate::training::{train_test_split, Estimator, Metrics, ProblemType};
use ndarray::Array1;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The automated pipeline: clean, infer, select, fit, score, serve.
///
/// Holds at most one [`TrainedPipeline`]. `train` builds a complete snapshot
/// without holding the lock and publishes it with a single pointer swap; `predict`
/// clones the current `Arc` and never blocks a concurrent `train`. A failed `train`
/// leaves the previous snapshot in place.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    state: RwLock<Option<Arc<TrainedPipeline>>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Train on CSV text (header row, last column is the target)
    pub fn train(&self, csv: &str) -> Result<Metrics> {
        let start = Instant::now();

        let snapshot = self.fit_snapshot(csv).map_err(|err| {
            warn!(error = %err, "Training failed");
            PipelineError::training(err)
        })?;
        let metrics = snapshot.metrics.clone();

        info!(
            model = snapshot.model.class_name(),
            problem_type = %snapshot.problem_type,
            accuracy = metrics.accuracy,
            trained_at = %snapshot.trained_at.to_rfc3339(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Model trained"
        );

        *self.state.write() = Some(Arc::new(snapshot));
        Ok(metrics)
    }

    fn fit_snapshot(&self, csv: &str) -> Result<TrainedPipeline> {
        let dataset = Dataset::from_csv_str(csv)?;
        let cleaned = self.config.preprocessor().clean(&dataset)?;
        let (features, target) = cleaned.split_target()?;
        let n_samples = cleaned.n_rows();

        let problem_type = ProblemType::infer(&target, self.config.classification_threshold);
        debug!(
            rows = n_samples,
            features = features.names.len(),
            problem_type = %problem_type,
            "Prepared training data"
        );

        let mut scaler = StandardScaler::new();
        let x = scaler.fit_transform(&features.values)?;

        let (y, label_encoder) = match problem_type {
            ProblemType::Classification => {
                let mut encoder = LabelEncoder::new();
                let y = encoder.fit_transform(&target)?;
                (y, Some(encoder))
            }
            ProblemType::Regression => (numeric_target(&target)?, None),
        };

        let split = train_test_split(&x, &y, self.config.test_size, self.config.random_state)?;

        let kind = self.config.selector().select(problem_type, split.x_train.nrows());
        info!(
            model = kind.class_name(),
            n_train = split.x_train.nrows(),
            n_test = split.x_test.nrows(),
            "Selected model"
        );

        let mut model = kind.build(self.config.n_estimators, self.config.random_state);
        model.fit(&split.x_train, &split.y_train)?;
        let y_pred = model.predict(&split.x_test)?;

        let y_test = split.y_test.to_vec();
        let y_pred = y_pred.to_vec();
        let metrics = match problem_type {
            ProblemType::Classification => Metrics::classification(&y_test, &y_pred, features.names.clone(), n_samples),
            ProblemType::Regression => Metrics::regression(&y_test, &y_pred, features.names.clone(), n_samples),
        };

        Ok(TrainedPipeline {
            model,
            scaler,
            label_encoder,
            problem_type,
            feature_names: features.names,
            metrics,
            trained_at: chrono::Utc::now(),
        })
    }

    /// Predict one feature row with the published model
    pub fn predict(&self, features: &[FeatureValue]) -> Result<Vec<Label>> {
        self.predict_with_model_type(features).map(|output| output.predictions)
    }

    /// Like [`predict`](Self::predict), also reporting the problem type of the
    /// snapshot that served the request
    pub fn predict_with_model_type(&self, features: &[FeatureValue]) -> Result<PredictionOutput> {
        let snapshot = self.snapshot().ok_or(PipelineError::NotTrained)?;
        snapshot.predict(features).map_err(|err| {
            debug!(error = %err, "Prediction failed");
            PipelineError::prediction(err)
        })
    }

    /// The currently published snapshot, if any
    pub fn snapshot(&self) -> Option<Arc<TrainedPipeline>> {
        self.state.read().clone()
    }

    pub fn is_trained(&self) -> bool {
        self.state.read().is_some()
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.snapshot().map(|snapshot| snapshot.model_info())
    }
}

fn numeric_target(target: &[Label]) -> Result<Array1<f64>> {
    target
        .iter()
        .map(|label| match label {
            Label::Number(v) => Ok(*v),
            Label::Text(s) => Err(PipelineError::Data(format!("regression target '{}' is not numeric", s))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification_csv() -> String {
        let mut csv = String::from("height,weight,animal\n");
        for i in 0..12 {
            let (h, w, a) = if i % 2 == 0 {
                (20.0 + i as f64, 4.0 + i as f64 * 0.1, "cat")
            } else {
                (60.0 + i as f64, 30.0 + i as f64, "dog")
            };
            csv.push_str(&format!("{},{},{}\n", h, w, a));
        }
        csv
    }

    #[test]
    fn test_predict_before_train() {
        let pipeline = Pipeline::default();
        let err = pipeline.predict(&[1.0.into()]).unwrap_err();
        assert!(matches!(err, PipelineError::NotTrained));
        assert!(pipeline.model_info().is_none());
    }

    #[test]
    fn test_train_and_predict_text_labels() {
        let pipeline = Pipeline::default();
        let metrics = pipeline.train(&classification_csv()).unwrap();

        assert_eq!(metrics.model_type, ProblemType::Classification);
        assert_eq!(metrics.n_samples, 12);
        assert!((0.0..=1.0).contains(&metrics.accuracy));

        let info = pipeline.model_info().unwrap();
        assert_eq!(info.model_class, "RandomForestClassifier");
        assert_eq!(info.features, vec!["height", "weight"]);

        let predictions = pipeline.predict(&[20.0.into(), 4.0.into()]).unwrap();
        assert_eq!(predictions.len(), 1);
        assert!(matches!(&predictions[0], Label::Text(s) if s == "cat" || s == "dog"));
    }

    #[test]
    fn test_failed_train_keeps_previous_snapshot() {
        let pipeline = Pipeline::default();
        pipeline.train(&classification_csv()).unwrap();
        let before = pipeline.snapshot().unwrap();

        let err = pipeline.train("a,b\n1,2\n3,4\n").unwrap_err();
        assert!(matches!(err, PipelineError::Training(_)));
        assert!(matches!(err.root(), PipelineError::Data(_)));

        assert!(Arc::ptr_eq(&before, &pipeline.snapshot().unwrap()));
    }

    #[test]
    fn test_snapshot_records_training_time() {
        let pipeline = Pipeline::default();
        let before = chrono::Utc::now();
        pipeline.train(&classification_csv()).unwrap();
        let trained_at = pipeline.snapshot().unwrap().trained_at;
        assert!(trained_at >= before && trained_at <= chrono::Utc::now());
    }

    #[test]
    fn test_wrong_feature_count() {
        let pipeline = Pipeline::default();
        pipeline.train(&classification_csv()).unwrap();

        let err = pipeline.predict(&[1.0.into()]).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
        assert!(matches!(err.root(), PipelineError::Shape { .. }));
    }

    #[test]
    fn test_numeric_target() {
        assert_eq!(numeric_target(&[Label::Number(1.5)]).unwrap()[0], 1.5);
        assert!(numeric_target(&[Label::Text("x".into())]).is_err());
    }
}
