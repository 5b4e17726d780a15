//! Deterministic train/test split

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rows of one split
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Shuffled row indices `(train, test)`.
///
/// `n_test = ceil(test_size * n)`; indices `0..n` are Fisher–Yates shuffled with
/// `ChaCha8Rng::seed_from_u64(seed)` and the first `n_test` of them are the test rows.
pub fn split_indices(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_size) {
        return Err(PipelineError::Data(format!("test_size must be in [0, 1), got {}", test_size)));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test >= n {
        return Err(PipelineError::Data(format!(
            "{} rows leave no training data with test_size {}",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

pub fn train_test_split(x: &Array2<f64>, y: &Array1<f64>, test_size: f64, seed: u64) -> Result<Split> {
    if x.nrows() != y.len() {
        return Err(PipelineError::Shape {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }

    let (train, test) = split_indices(x.nrows(), test_size, seed)?;
    Ok(Split {
        x_train: x.select(Axis(0), &train),
        x_test: x.select(Axis(0), &test),
        y_train: y.select(Axis(0), &train),
        y_test: y.select(Axis(0), &test),
    })
}
