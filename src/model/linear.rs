//! Elastic-net linear regression solver

use crate::config::{LinearParams, Loss};
use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Default name of the feature column consumed by the model stage
pub const DEFAULT_FEATURES_COL: &str = "features";

/// Default name of the label column
pub const DEFAULT_LABEL_COL: &str = "label";

/// Linear regression with an elastic-net penalty.
///
/// Squared-error loss is solved by coordinate descent; the penalty is
/// `regParam * (elasticNetParam * ||w||_1 + (1 - elasticNetParam)/2 * ||w||_2^2)`,
/// so `elasticNetParam = 0` is ridge and `elasticNetParam = 1` is lasso.
/// Huber loss is solved by full-batch gradient descent and supports an L2
/// penalty only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    params: LinearParams,
    features_col: String,
    label_col: String,
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    is_fitted: bool,
}

impl LinearRegression {
    /// Create an unfitted model from a hyperparameter table
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            features_col: DEFAULT_FEATURES_COL.to_string(),
            label_col: DEFAULT_LABEL_COL.to_string(),
            coefficients: None,
            intercept: None,
            is_fitted: false,
        }
    }

    /// Set the feature column consumed by this stage
    pub fn with_features_col(mut self, col: impl Into<String>) -> Self {
        self.features_col = col.into();
        self
    }

    /// Set the label column
    pub fn with_label_col(mut self, col: impl Into<String>) -> Self {
        self.label_col = col.into();
        self
    }

    /// The hyperparameter table this model was configured with
    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    /// Name of the consumed feature column
    pub fn features_col(&self) -> &str {
        &self.features_col
    }

    /// Name of the label column
    pub fn label_col(&self) -> &str {
        &self.label_col
    }

    /// Fitted coefficients, if any
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Fitted intercept, if any
    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    /// Whether the model has been fitted
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn validate_params(&self) -> Result<()> {
        let p = &self.params;
        if p.max_iter < 1 {
            return Err(PipelineError::InvalidParameter {
                name: "maxIter".to_string(),
                value: p.max_iter.to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        if p.reg_param < 0.0 || !p.reg_param.is_finite() {
            return Err(PipelineError::InvalidParameter {
                name: "regParam".to_string(),
                value: p.reg_param.to_string(),
                reason: "must be a non-negative number".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&p.elastic_net_param) {
            return Err(PipelineError::InvalidParameter {
                name: "elasticNetParam".to_string(),
                value: p.elastic_net_param.to_string(),
                reason: "must be in [0, 1]".to_string(),
            });
        }
        if p.tol <= 0.0 || !p.tol.is_finite() {
            return Err(PipelineError::InvalidParameter {
                name: "tol".to_string(),
                value: p.tol.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }
        if p.epsilon <= 1.0 || !p.epsilon.is_finite() {
            return Err(PipelineError::InvalidParameter {
                name: "epsilon".to_string(),
                value: p.epsilon.to_string(),
                reason: "must be > 1".to_string(),
            });
        }
        if p.loss == Loss::Huber && p.elastic_net_param > 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "elasticNetParam".to_string(),
                value: p.elastic_net_param.to_string(),
                reason: "huber loss only supports an L2 penalty (elasticNetParam = 0)"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Fit the model to a feature matrix and label vector
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        self.validate_params()?;

        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PipelineError::DataError(
                "cannot fit on empty data".to_string(),
            ));
        }

        // Center data so the intercept drops out of the solve
        let x_mean = x.mean_axis(Axis(0)).unwrap();
        let y_mean = y.mean().unwrap_or(0.0);
        let x_c = x - &x_mean.clone().insert_axis(Axis(0));
        let y_c = y - y_mean;

        let (w, intercept) = match self.params.loss {
            Loss::SquaredError => {
                let w = self.fit_coordinate_descent(&x_c, &y_c)?;
                let b = y_mean - w.dot(&x_mean);
                (w, b)
            }
            Loss::Huber => {
                let (w, b_c) = self.fit_huber(&x_c, &y_c)?;
                // undo the centering in the intercept
                let b = b_c + y_mean - w.dot(&x_mean);
                (w, b)
            }
        };

        self.coefficients = Some(w);
        self.intercept = Some(intercept);
        self.is_fitted = true;
        Ok(self)
    }

    /// Coordinate descent for squared-error loss with an elastic-net penalty
    fn fit_coordinate_descent(
        &self,
        x_c: &Array2<f64>,
        y_c: &Array1<f64>,
    ) -> Result<Array1<f64>> {
        let n_samples = x_c.nrows();
        let n_features = x_c.ncols();

        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| x_c.column(j).mapv(|v| v * v).sum())
            .collect();

        let mut w: Array1<f64> = Array1::zeros(n_features);
        let n = n_samples as f64;
        let l1_penalty = self.params.reg_param * self.params.elastic_net_param * n;
        let l2_penalty = self.params.reg_param * (1.0 - self.params.elastic_net_param) * n;

        for _iter in 0..self.params.max_iter {
            let w_old = w.clone();

            // Residual maintained incrementally across the coordinate loop
            let mut r = y_c - &x_c.dot(&w);

            for j in 0..n_features {
                let denom = col_norms[j] + l2_penalty;
                if denom < 1e-15 {
                    w[j] = 0.0;
                    continue;
                }
                let rho = x_c.column(j).dot(&r) + col_norms[j] * w[j];
                let old_wj = w[j];
                w[j] = soft_threshold(rho, l1_penalty) / denom;
                if (old_wj - w[j]).abs() > 0.0 {
                    r = r + &(&x_c.column(j) * (old_wj - w[j]));
                }
            }

            let diff = (&w - &w_old).mapv(|v| v.abs()).sum();
            if diff < self.params.tol {
                break;
            }
        }

        Ok(w)
    }

    /// Gradient descent for Huber loss with an L2 penalty.
    ///
    /// The step size is derived from a Lipschitz bound on the gradient, so
    /// every step is a descent step. Returns coefficients and the intercept
    /// relative to the centered data.
    fn fit_huber(&self, x_c: &Array2<f64>, y_c: &Array1<f64>) -> Result<(Array1<f64>, f64)> {
        let n_samples = x_c.nrows();
        let n_features = x_c.ncols();
        let n = n_samples as f64;
        let eps = self.params.epsilon;
        let reg = self.params.reg_param;

        // Hessian bound: X^T X / n + reg for w, 1 for the intercept
        let lipschitz = x_c.iter().map(|v| v * v).sum::<f64>() / n + 1.0 + reg;
        let lr = 1.0 / lipschitz;

        let mut w: Array1<f64> = Array1::zeros(n_features);
        let mut b = 0.0;

        for _iter in 0..self.params.max_iter {
            let r = y_c - &x_c.dot(&w) - b;
            let psi = r.mapv(|ri| if ri.abs() <= eps { ri } else { eps * ri.signum() });

            let grad_w = x_c.t().dot(&psi).mapv(|v| -v / n) + &(&w * reg);
            let grad_b = -psi.sum() / n;

            let step_w = grad_w.mapv(|g| g * lr);
            let step_b = grad_b * lr;
            w = w - &step_w;
            b -= step_b;

            let diff = step_w.mapv(|v| v.abs()).sum() + step_b.abs();
            if diff < self.params.tol {
                break;
            }
        }

        Ok((w, b))
    }

    /// Predict labels for a feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::ModelNotFitted);
        }
        let coefficients = self.coefficients.as_ref().unwrap();
        if x.ncols() != coefficients.len() {
            return Err(PipelineError::ShapeError {
                expected: format!("{} feature dimensions", coefficients.len()),
                actual: format!("{} feature dimensions", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

/// Soft-threshold operator for the L1 proximal step
fn soft_threshold(val: f64, threshold: f64) -> f64 {
    if val > threshold {
        val - threshold
    } else if val < -threshold {
        val + threshold
    } else {
        0.0
    }
}
