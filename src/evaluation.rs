//! Regression evaluation metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Standard regression metrics over a prediction/label pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute metrics from true and predicted labels.
    ///
    /// Lengths must match; on empty input every metric is zero except
    /// `r2`, which is 1 by convention (also used for a constant target).
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len();
        if n == 0 {
            return Self {
                mse: 0.0,
                rmse: 0.0,
                mae: 0.0,
                r2: 1.0,
                n_samples: 0,
            };
        }

        let residuals = y_pred - y_true;
        let mse = residuals.mapv(|v| v * v).sum() / n as f64;
        let mae = residuals.mapv(|v| v.abs()).sum() / n as f64;

        let y_mean = y_true.mean().unwrap_or(0.0);
        let ss_res = residuals.mapv(|v| v * v).sum();
        let ss_tot = y_true.mapv(|v| (v - y_mean) * (v - y_mean)).sum();
        let r2 = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

        Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
            n_samples: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        let metrics = RegressionMetrics::compute(&y, &y.clone());
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, 1.0);
        assert_eq!(metrics.n_samples, 3);
    }

    #[test]
    fn test_known_errors() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![2.0, 2.0, 3.0, 3.0];
        let metrics = RegressionMetrics::compute(&y_true, &y_pred);
        assert!((metrics.mse - 0.5).abs() < 1e-12);
        assert!((metrics.mae - 0.5).abs() < 1e-12);
        assert!((metrics.rmse - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(metrics.r2 < 1.0);
    }

    #[test]
    fn test_constant_target() {
        let y_true = array![5.0, 5.0, 5.0];
        let y_pred = array![5.0, 5.0, 5.0];
        let metrics = RegressionMetrics::compute(&y_true, &y_pred);
        assert_eq!(metrics.r2, 1.0);
    }
}
