//! Loading the automotive dataset

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use std::fs::File;
use std::time::Instant;
use tracing::info;

/// Load a CSV file with a header row and inferred schema
pub fn load_csv(path: &str) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| PipelineError::DataError(e.to_string()))?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| PipelineError::DataError(e.to_string()))
}

/// Load the auto-mpg CSV.
///
/// The dataset marks missing horsepower readings with `?`; those parse as
/// nulls, rows containing any null are dropped, and all numeric columns are
/// cast to `Float64` for uniform downstream processing.
pub fn load_auto_mpg(path: &str) -> Result<DataFrame> {
    let start = Instant::now();
    let file = File::open(path).map_err(|e| PipelineError::DataError(e.to_string()))?;

    let parse_opts = CsvParseOptions::default()
        .with_null_values(Some(NullValues::AllColumnsSingle("?".into())));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .with_parse_options(parse_opts)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| PipelineError::DataError(e.to_string()))?;

    let df = drop_null_rows(&df)?;
    let df = cast_numeric_to_f64(&df)?;

    info!(
        rows = df.height(),
        "loaded auto-mpg data in {:.3}s",
        start.elapsed().as_secs_f64()
    );
    Ok(df)
}

/// Drop every row containing a null in any column
pub fn drop_null_rows(df: &DataFrame) -> Result<DataFrame> {
    let mut mask: Option<BooleanChunked> = None;
    for col in df.get_columns() {
        let not_null = col.as_materialized_series().is_not_null();
        mask = Some(match mask {
            Some(m) => &m & &not_null,
            None => not_null,
        });
    }

    match mask {
        Some(m) => df
            .filter(&m)
            .map_err(|e| PipelineError::DataError(e.to_string())),
        None => Ok(df.clone()),
    }
}

/// Cast all integer and Float32 columns to Float64
pub fn cast_numeric_to_f64(df: &DataFrame) -> Result<DataFrame> {
    let mut result = df.clone();
    for col in df.get_columns() {
        match col.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32 => {
                let casted = col
                    .cast(&DataType::Float64)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?;
                result = result
                    .with_column(casted)
                    .map_err(|e| PipelineError::DataError(e.to_string()))?
                    .clone();
            }
            _ => {}
        }
    }
    Ok(result)
}
