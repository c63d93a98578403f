//! Hyperparameter tables for the regression variants

use serde::{Deserialize, Serialize};

/// Loss function used by the linear regression solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Loss {
    /// Ordinary squared-error loss
    SquaredError,
    /// Huber loss, robust to outliers beyond `epsilon`
    Huber,
}

/// Hyperparameters accepted by the linear regression solver.
///
/// Field names serialize to the solver's parameter map keys
/// (`maxIter`, `regParam`, `elasticNetParam`, `tol`, `loss`, `epsilon`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearParams {
    /// Maximum number of solver iterations
    pub max_iter: usize,

    /// Regularization strength (multiplier on the penalty term)
    pub reg_param: f64,

    /// Elastic-net mixing ratio: 0.0 = pure L2 (ridge), 1.0 = pure L1 (lasso)
    pub elastic_net_param: f64,

    /// Convergence tolerance on the coefficient update
    pub tol: f64,

    /// Loss function
    pub loss: Loss,

    /// Huber threshold; inert unless `loss` is [`Loss::Huber`]
    pub epsilon: f64,
}

impl LinearParams {
    /// Table shared by every regression flow. The variants override exactly
    /// one field of this table, see [`RegressionVariant::parameters`].
    fn base() -> Self {
        Self {
            max_iter: 20,
            reg_param: 0.5,
            elastic_net_param: 0.5,
            tol: 1e-6,
            loss: Loss::SquaredError,
            epsilon: 1.35,
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the regularization strength
    pub fn with_reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    /// Set the elastic-net mixing ratio
    pub fn with_elastic_net_param(mut self, ratio: f64) -> Self {
        self.elastic_net_param = ratio;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the loss function
    pub fn with_loss(mut self, loss: Loss) -> Self {
        self.loss = loss;
        self
    }

    /// Set the Huber threshold
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// The supported regression variants. Each one is a pure override of the
/// shared base table, so the three stay consistent if the base changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegressionVariant {
    /// Ordinary multiple regression (elastic-net blend)
    Multiple,
    /// Ridge regression (pure L2 penalty)
    Ridge,
    /// Lasso regression (pure L1 penalty)
    Lasso,
}

impl RegressionVariant {
    /// Return the hyperparameter table for this variant.
    ///
    /// Recomputed on every call; nothing is cached or mutated.
    pub fn parameters(&self) -> LinearParams {
        let base = LinearParams::base();
        match self {
            RegressionVariant::Multiple => base,
            RegressionVariant::Ridge => LinearParams {
                elastic_net_param: 0.0,
                ..base
            },
            RegressionVariant::Lasso => LinearParams {
                elastic_net_param: 1.0,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_map_has_exactly_six_keys() {
        for variant in [
            RegressionVariant::Multiple,
            RegressionVariant::Ridge,
            RegressionVariant::Lasso,
        ] {
            let value = serde_json::to_value(variant.parameters()).unwrap();
            let map = value.as_object().unwrap();
            assert_eq!(map.len(), 6);
            for key in ["maxIter", "regParam", "elasticNetParam", "tol", "loss", "epsilon"] {
                assert!(map.contains_key(key), "missing key {key}");
            }
        }
    }

    #[test]
    fn test_ridge_parameters() {
        let value = serde_json::to_value(RegressionVariant::Ridge.parameters()).unwrap();
        assert_eq!(
            value,
            json!({
                "maxIter": 20,
                "regParam": 0.5,
                "elasticNetParam": 0.0,
                "tol": 1e-6,
                "loss": "squaredError",
                "epsilon": 1.35
            })
        );
    }

    #[test]
    fn test_lasso_parameters() {
        let value = serde_json::to_value(RegressionVariant::Lasso.parameters()).unwrap();
        assert_eq!(
            value,
            json!({
                "maxIter": 20,
                "regParam": 0.5,
                "elasticNetParam": 1.0,
                "tol": 1e-6,
                "loss": "squaredError",
                "epsilon": 1.35
            })
        );
    }

    #[test]
    fn test_variants_differ_only_in_elastic_net_ratio() {
        let multiple = RegressionVariant::Multiple.parameters();
        let ridge = RegressionVariant::Ridge.parameters();
        let lasso = RegressionVariant::Lasso.parameters();

        assert_eq!(multiple.elastic_net_param, 0.5);
        assert_eq!(ridge.elastic_net_param, 0.0);
        assert_eq!(lasso.elastic_net_param, 1.0);

        for params in [ridge, lasso] {
            assert_eq!(params.max_iter, multiple.max_iter);
            assert_eq!(params.reg_param, multiple.reg_param);
            assert_eq!(params.tol, multiple.tol);
            assert_eq!(params.loss, multiple.loss);
            assert_eq!(params.epsilon, multiple.epsilon);
        }
    }

    #[test]
    fn test_parameters_idempotent() {
        let first = RegressionVariant::Ridge.parameters();
        for _ in 0..3 {
            assert_eq!(RegressionVariant::Ridge.parameters(), first);
        }
    }

    #[test]
    fn test_builder_pattern() {
        let params = RegressionVariant::Multiple
            .parameters()
            .with_max_iter(200)
            .with_reg_param(0.0)
            .with_loss(Loss::Huber)
            .with_epsilon(2.0);

        assert_eq!(params.max_iter, 200);
        assert_eq!(params.reg_param, 0.0);
        assert_eq!(params.loss, Loss::Huber);
        assert_eq!(params.epsilon, 2.0);
        // untouched fields keep the base values
        assert_eq!(params.elastic_net_param, 0.5);
        assert_eq!(params.tol, 1e-6);
    }
}
