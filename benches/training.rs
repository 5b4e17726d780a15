use automl_pipeline::data::FeatureValue;
use automl_pipeline::pipeline::Pipeline;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_regression_csv(n_rows: usize, n_features: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let mut csv: String = (0..n_features)
        .map(|i| format!("feature_{}", i))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(",target\n");

    for _ in 0..n_rows {
        let row: Vec<f64> = (0..n_features).map(|_| rng.gen::<f64>() * 10.0).collect();
        // Target is the sum of features plus noise
        let target = row.iter().sum::<f64>() + rng.gen::<f64>() * 0.1;
        for value in &row {
            csv.push_str(&format!("{:.5},", value));
        }
        csv.push_str(&format!("{:.5}\n", target));
    }
    csv
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10); // Fewer samples for training benchmarks

    // one size per model band: forest, linear, svm
    for n_rows in [500, 5000, 15000].iter() {
        let csv = create_regression_csv(*n_rows, 10);

        group.bench_with_input(BenchmarkId::new("train", n_rows), &csv, |b, csv| {
            b.iter(|| {
                let pipeline = Pipeline::default();
                pipeline.train(black_box(csv)).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    for n_rows in [500, 5000].iter() {
        let pipeline = Pipeline::default();
        pipeline.train(&create_regression_csv(*n_rows, 10)).unwrap();
        let row: Vec<FeatureValue> = (0..10).map(|i| FeatureValue::Number(i as f64)).collect();

        group.bench_with_input(BenchmarkId::new("predict", n_rows), &row, |b, row| {
            b.iter(|| pipeline.predict(black_box(row)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
