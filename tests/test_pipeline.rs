//! Integration test: train/predict through the public pipeline API

use automl_pipeline::data::{FeatureValue, Label};
use automl_pipeline::pipeline::{Pipeline, PipelineConfig};
use automl_pipeline::training::{ModelKind, ModelSelector, ProblemType};
use automl_pipeline::PipelineError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

fn cat_dog_csv() -> String {
    let mut csv = String::from("height,weight,animal\n");
    for i in 0..12 {
        if i % 2 == 0 {
            csv.push_str(&format!("{},{},cat\n", 20 + i, 4 + i));
        } else {
            csv.push_str(&format!("{},{},dog\n", 60 + i, 30 + i));
        }
    }
    csv
}

fn regression_csv(n: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut csv = String::from("x1,x2,y\n");
    for _ in 0..n {
        let x1: f64 = rng.gen_range(0.0..10.0);
        let x2: f64 = rng.gen_range(0.0..10.0);
        let y = 3.0 * x1 - 2.0 * x2 + 1.0 + rng.gen_range(-0.01..0.01);
        csv.push_str(&format!("{:.4},{:.4},{:.4}\n", x1, x2, y));
    }
    csv
}

fn large_offset_regression_csv(n: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut csv = String::from("rooms,age,price\n");
    for _ in 0..n {
        let rooms: f64 = rng.gen_range(0.0..10.0);
        let age: f64 = rng.gen_range(0.0..50.0);
        let price = 200_000.0 + 1_000.0 * rooms - 100.0 * age + rng.gen_range(-50.0..50.0);
        csv.push_str(&format!("{:.4},{:.4},{:.2}\n", rooms, age, price));
    }
    csv
}

/// Two text classes split by `x1 + x2 = 10`, with a margin of 1 around the boundary
fn separable_classification_csv(n: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut csv = String::from("x1,x2,size\n");
    let mut rows = 0;
    while rows < n {
        let x1: f64 = rng.gen_range(0.0..10.0);
        let x2: f64 = rng.gen_range(0.0..10.0);
        let margin = x1 + x2 - 10.0;
        if margin.abs() < 1.0 {
            continue;
        }
        let label = if margin > 0.0 { "big" } else { "small" };
        csv.push_str(&format!("{:.4},{:.4},{}\n", x1, x2, label));
        rows += 1;
    }
    csv
}

#[test]
fn test_small_text_target_is_random_forest_classification() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let metrics = pipeline.train(&cat_dog_csv()).unwrap();

    assert_eq!(metrics.model_type, ProblemType::Classification);
    assert!((0.0..=1.0).contains(&metrics.accuracy));
    assert_eq!(metrics.n_samples, 12);
    assert_eq!(metrics.n_features, 2);
    assert!(metrics.mse.is_none());

    let info = pipeline.model_info().unwrap();
    assert_eq!(info.model_class, "RandomForestClassifier");
    assert_eq!(info.model_type, ProblemType::Classification);
}

#[test]
fn test_predict_training_row_returns_known_label() {
    let pipeline = Pipeline::default();
    pipeline.train(&cat_dog_csv()).unwrap();

    let predictions = pipeline.predict(&[FeatureValue::from(20.0), FeatureValue::from(4.0)]).unwrap();
    assert_eq!(predictions.len(), 1);
    match &predictions[0] {
        Label::Text(s) => assert!(s == "cat" || s == "dog"),
        other => panic!("expected text label, got {:?}", other),
    }
}

#[test]
fn test_numeric_strings_accepted_at_predict_time() {
    let pipeline = Pipeline::default();
    pipeline.train(&cat_dog_csv()).unwrap();

    let from_strings = pipeline.predict(&["64".into(), " 34 ".into()]).unwrap();
    let from_numbers = pipeline.predict(&[64.0.into(), 34.0.into()]).unwrap();
    assert_eq!(from_strings, from_numbers);

    let err = pipeline.predict(&["tall".into(), 34.0.into()]).unwrap_err();
    assert!(matches!(err, PipelineError::Prediction(_)));
    assert!(err.to_string().starts_with("Prediction failed:"));
}

#[test]
fn test_training_is_idempotent() {
    let csv = regression_csv(60);
    let row = [FeatureValue::from(4.0), FeatureValue::from(2.5)];

    let pipeline = Pipeline::default();
    let first_metrics = pipeline.train(&csv).unwrap();
    let first = pipeline.predict(&row).unwrap();
    let second_metrics = pipeline.train(&csv).unwrap();
    let second = pipeline.predict(&row).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_metrics, second_metrics);
}

#[test]
fn test_regression_path() {
    let pipeline = Pipeline::default();
    let metrics = pipeline.train(&regression_csv(200)).unwrap();

    assert_eq!(metrics.model_type, ProblemType::Regression);
    let r2 = metrics.r2.unwrap();
    assert!(r2 > 0.8, "r2 = {}", r2);
    assert!((metrics.accuracy - r2.max(0.0) * 100.0).abs() < 1e-9);
    assert!(metrics.mse.unwrap() >= 0.0);
    assert_eq!(pipeline.model_info().unwrap().model_class, "RandomForestRegressor");

    let predictions = pipeline.predict(&[5.0.into(), 5.0.into()]).unwrap();
    assert!(matches!(predictions[0], Label::Number(_)));
}

#[test]
fn test_medium_dataset_uses_linear_regression() {
    let pipeline = Pipeline::default();
    pipeline.train(&regression_csv(1500)).unwrap();
    assert_eq!(pipeline.model_info().unwrap().model_class, "LinearRegression");

    let predictions = pipeline.predict(&[2.0.into(), 1.0.into()]).unwrap();
    match predictions[0] {
        Label::Number(v) => assert!((v - 5.0).abs() < 0.1, "predicted {}", v),
        ref other => panic!("expected number, got {:?}", other),
    }
}

#[test]
fn test_too_few_rows_leaves_untrained() {
    let pipeline = Pipeline::default();
    let mut csv = String::from("a,b,label\n");
    for i in 0..9 {
        csv.push_str(&format!("{},{},{}\n", i, i * 2, i % 2));
    }

    let err = pipeline.train(&csv).unwrap_err();
    assert!(matches!(err, PipelineError::Training(_)));
    assert!(matches!(err.root(), PipelineError::Data(_)));
    assert!(!pipeline.is_trained());
}

#[test]
fn test_missing_rows_are_dropped_before_size_check() {
    let mut csv = cat_dog_csv();
    csv.push_str("NA,5,cat\n,6,dog\n");

    let pipeline = Pipeline::default();
    let metrics = pipeline.train(&csv).unwrap();
    assert_eq!(metrics.n_samples, 12);
}

#[test]
fn test_failed_train_keeps_previous_model() {
    let pipeline = Pipeline::default();
    pipeline.train(&cat_dog_csv()).unwrap();
    let before = pipeline.snapshot().unwrap();

    assert!(pipeline.train("x,y\n1,2\n").is_err());
    assert!(Arc::ptr_eq(&before, &pipeline.snapshot().unwrap()));
    assert_eq!(pipeline.model_info().unwrap().model_class, "RandomForestClassifier");
}

#[test]
fn test_predict_before_train() {
    let pipeline = Pipeline::default();
    let err = pipeline.predict(&[1.0.into(), 2.0.into()]).unwrap_err();
    assert!(matches!(err, PipelineError::NotTrained));
    assert_eq!(err.to_string(), "Model not trained yet");
}

#[test]
fn test_wrong_length_keeps_state() {
    let pipeline = Pipeline::default();
    pipeline.train(&cat_dog_csv()).unwrap();
    let before = pipeline.snapshot().unwrap();

    let err = pipeline.predict(&[1.0.into(), 2.0.into(), 3.0.into()]).unwrap_err();
    assert!(matches!(err.root(), PipelineError::Shape { .. }));
    assert!(Arc::ptr_eq(&before, &pipeline.snapshot().unwrap()));
}

#[test]
fn test_selector_boundaries() {
    let selector = ModelSelector::default();
    let cases = [
        (999, ModelKind::RandomForestClassifier, ModelKind::RandomForestRegressor),
        (1000, ModelKind::LogisticRegression, ModelKind::LinearRegression),
        (9999, ModelKind::LogisticRegression, ModelKind::LinearRegression),
        (10000, ModelKind::SupportVectorClassifier, ModelKind::SupportVectorRegressor),
    ];
    for (n, classifier, regressor) in cases {
        assert_eq!(selector.select(ProblemType::Classification, n), classifier, "n = {}", n);
        assert_eq!(selector.select(ProblemType::Regression, n), regressor, "n = {}", n);
    }
}

#[test]
fn test_concurrent_predict_during_train() {
    let pipeline = Arc::new(Pipeline::default());
    pipeline.train(&cat_dog_csv()).unwrap();

    let trainer = {
        let pipeline = Arc::clone(&pipeline);
        std::thread::spawn(move || pipeline.train(&cat_dog_csv()))
    };
    for _ in 0..20 {
        let predictions = pipeline.predict(&[20.0.into(), 4.0.into()]).unwrap();
        assert_eq!(predictions.len(), 1);
    }
    trainer.join().unwrap().unwrap();
}

#[test]
fn test_medium_text_target_uses_logistic_regression() {
    let pipeline = Pipeline::default();
    let metrics = pipeline.train(&separable_classification_csv(1500)).unwrap();

    assert_eq!(pipeline.model_info().unwrap().model_class, "LogisticRegression");
    assert_eq!(metrics.model_type, ProblemType::Classification);
    assert!(metrics.accuracy > 0.9, "accuracy = {}", metrics.accuracy);

    let predictions = pipeline.predict(&[9.0.into(), 9.0.into()]).unwrap();
    assert_eq!(predictions, vec![Label::Text("big".to_string())]);
}

#[test]
fn test_large_dataset_uses_svc() {
    let pipeline = Pipeline::default();
    let metrics = pipeline.train(&separable_classification_csv(12600)).unwrap();

    assert_eq!(pipeline.model_info().unwrap().model_class, "SVC");
    assert!(metrics.accuracy > 0.9, "accuracy = {}", metrics.accuracy);

    let predictions = pipeline.predict(&[1.0.into(), 1.0.into()]).unwrap();
    assert_eq!(predictions, vec![Label::Text("small".to_string())]);
}

#[test]
fn test_large_dataset_svr_handles_offset_target() {
    let pipeline = Pipeline::default();
    let metrics = pipeline.train(&large_offset_regression_csv(12600)).unwrap();

    assert_eq!(pipeline.model_info().unwrap().model_class, "SVR");
    let r2 = metrics.r2.unwrap();
    assert!(r2 > 0.5, "r2 = {}", r2);

    match pipeline.predict(&[5.0.into(), 25.0.into()]).unwrap()[0] {
        Label::Number(v) => assert!((v - 202_500.0).abs() < 5_000.0, "predicted {}", v),
        ref other => panic!("expected number, got {:?}", other),
    }
}
