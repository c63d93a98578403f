//! Standardization of assembled feature vectors

use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Standardizes a vector-valued column to zero mean and unit variance per
/// dimension, using the sample standard deviation (ddof = 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    input_col: String,
    output_col: String,
    with_mean: bool,
    with_std: bool,
    means: Option<Array1<f64>>,
    stds: Option<Array1<f64>>,
    is_fitted: bool,
}

impl StandardScaler {
    /// Create a scaler reading `input_col` and writing `output_col`.
    /// Both mean-centering and variance-scaling are enabled by default.
    pub fn new(input_col: impl Into<String>, output_col: impl Into<String>) -> Self {
        Self {
            input_col: input_col.into(),
            output_col: output_col.into(),
            with_mean: true,
            with_std: true,
            means: None,
            stds: None,
            is_fitted: false,
        }
    }

    /// Enable/disable mean centering
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Enable/disable variance scaling
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Name of the consumed vector column
    pub fn input_col(&self) -> &str {
        &self.input_col
    }

    /// Name of the produced vector column
    pub fn output_col(&self) -> &str {
        &self.output_col
    }

    /// Fit per-dimension means and standard deviations
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n_rows = x.nrows();
        let n_dims = x.ncols();
        if n_rows == 0 {
            return Err(PipelineError::DataError(
                "cannot fit scaler on empty data".to_string(),
            ));
        }

        let stats: Vec<(f64, f64)> = (0..n_dims)
            .into_par_iter()
            .map(|j| {
                let col = x.column(j);
                let mean = col.mean().unwrap_or(0.0);
                let var = if n_rows > 1 {
                    col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
                        / (n_rows - 1) as f64
                } else {
                    0.0
                };
                let std = var.sqrt();
                // constant dimensions pass through unscaled
                (mean, if std == 0.0 { 1.0 } else { std })
            })
            .collect();

        self.means = Some(stats.iter().map(|(m, _)| *m).collect());
        self.stds = Some(stats.iter().map(|(_, s)| *s).collect());
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a feature matrix with the fitted statistics
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }
        let means = self.means.as_ref().unwrap();
        let stds = self.stds.as_ref().unwrap();

        if x.ncols() != means.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} feature dimensions", means.len()),
                actual: format!("{} feature dimensions", x.ncols()),
            });
        }

        Ok(Array2::from_shape_fn(x.raw_dim(), |(i, j)| {
            let mut v = x[[i, j]];
            if self.with_mean {
                v -= means[j];
            }
            if self.with_std {
                v /= stds[j];
            }
            v
        }))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}
