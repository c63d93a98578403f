//! Vector assembly: combining scalar columns into one feature matrix

use crate::error::{PipelineError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Combines a fixed set of numeric input columns into a single vector-valued
/// output column, one row vector per input row.
///
/// Stateless: there is nothing to fit, assembly is a pure per-row transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorAssembler {
    input_cols: Vec<String>,
    output_col: String,
}

impl VectorAssembler {
    /// Create an assembler over the given input columns
    pub fn new(input_cols: Vec<String>, output_col: impl Into<String>) -> Self {
        Self {
            input_cols,
            output_col: output_col.into(),
        }
    }

    /// Input column names, in vector order
    pub fn input_cols(&self) -> &[String] {
        &self.input_cols
    }

    /// Name of the produced vector column
    pub fn output_col(&self) -> &str {
        &self.output_col
    }

    /// Assemble the input columns into an `(n_rows, n_inputs)` matrix.
    ///
    /// Every input column must exist, be castable to `Float64`, and contain
    /// no nulls; the vector dimension is the number of input columns.
    pub fn assemble(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let n_cols = self.input_cols.len();

        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_cols);
        for col_name in &self.input_cols {
            let column = df
                .column(col_name)
                .map_err(|_| PipelineError::FeatureNotFound(col_name.clone()))?;
            let casted = column
                .cast(&DataType::Float64)
                .map_err(|e| PipelineError::DataError(e.to_string()))?;
            let ca = casted
                .f64()
                .map_err(|e| PipelineError::DataError(e.to_string()))?;

            let values: Vec<f64> = ca
                .into_iter()
                .map(|opt| {
                    opt.ok_or_else(|| {
                        PipelineError::DataError(format!(
                            "null value in feature column '{}'",
                            col_name
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            columns.push(values);
        }

        Ok(Array2::from_shape_fn((n_rows, n_cols), |(i, j)| {
            columns[j][i]
        }))
    }
}
