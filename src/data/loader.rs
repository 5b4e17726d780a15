//! CSV loading

use super::{Dataset, RawColumn};
use crate::error::Result;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Field values treated as missing, in addition to empty fields
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse comma-separated text with a header row into a [`Dataset`].
///
/// Every column is read as text (schema inference disabled) so that type
/// coercion is decided once, per column, by the preprocessor.
pub fn read_csv(text: &str) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()?;

    debug!(rows = df.height(), columns = df.width(), "Parsed CSV");
    frame_to_dataset(&df)
}

fn frame_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let as_text = column.as_materialized_series().cast(&DataType::String)?;
            let values = as_text
                .str()?
                .into_iter()
                .map(|value| value.and_then(normalize_missing))
                .collect();
            Ok(RawColumn::new(column.name().to_string(), values))
        })
        .collect::<Result<Vec<_>>>()?;

    Dataset::new(columns)
}

fn normalize_missing(value: &str) -> Option<String> {
    if MISSING_TOKENS.contains(&value.trim()) {
        None
    } else {
        Some(value.to_string())
    }
}
