//! Dataset cleaning and per-column type coercion

use super::{CleanColumn, CleanedDataset, ColumnData};
use crate::data::{Dataset, RawColumn};
use crate::error::{PipelineError, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Default minimum number of complete rows required for training
pub const MIN_ROWS: usize = 10;

/// Turns a raw [`Dataset`] into fully present numeric columns.
///
/// 1. columns that are entirely missing are dropped;
/// 2. rows with any missing value in the remaining columns are dropped;
/// 3. each column is numeric if every value parses as `f64`, otherwise the whole
///    column is categorical and encoded by the index of its value in the sorted set
///    of distinct values.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    min_rows: usize,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(MIN_ROWS)
    }
}

impl Preprocessor {
    pub fn new(min_rows: usize) -> Self {
        Self { min_rows }
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn clean(&self, dataset: &Dataset) -> Result<CleanedDataset> {
        let kept: Vec<&RawColumn> = dataset
            .columns()
            .iter()
            .filter(|c| !c.is_all_missing())
            .collect();

        let complete_rows: Vec<usize> = (0..dataset.n_rows())
            .filter(|&row| kept.iter().all(|c| c.values[row].is_some()))
            .collect();

        debug!(
            dropped_columns = dataset.n_columns() - kept.len(),
            dropped_rows = dataset.n_rows() - complete_rows.len(),
            "Dropped missing data"
        );

        if complete_rows.len() < self.min_rows {
            return Err(PipelineError::Data(format!(
                "Dataset too small for training: {} rows after cleaning, at least {} required",
                complete_rows.len(),
                self.min_rows
            )));
        }

        let columns = kept
            .into_iter()
            .map(|column| coerce_column(column, &complete_rows))
            .collect();

        Ok(CleanedDataset::new(columns))
    }
}

fn coerce_column(column: &RawColumn, rows: &[usize]) -> CleanColumn {
    let raw: Vec<&str> = rows
        .iter()
        .filter_map(|&row| column.values[row].as_deref())
        .collect();

    let numeric: Option<Vec<f64>> = raw.iter().map(|v| parse_strict(v)).collect();

    let data = match numeric {
        Some(values) => ColumnData::Numeric(values),
        None => {
            let levels: Vec<String> = raw
                .iter()
                .map(|v| v.to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let codes = raw
                .iter()
                .map(|v| levels.binary_search_by(|level| level.as_str().cmp(*v)).unwrap_or(0))
                .collect();
            debug!(column = %column.name, levels = levels.len(), "Encoded categorical column");
            ColumnData::Categorical { codes, levels }
        }
    };

    CleanColumn {
        name: column.name.clone(),
        data,
    }
}

/// Finite `f64` after trimming surrounding whitespace
fn parse_strict(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
