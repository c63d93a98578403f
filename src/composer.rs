//! Stage list construction for the auto-mpg regression flows

use crate::config::{LinearParams, RegressionVariant};
use crate::feature::{StandardScaler, VectorAssembler};
use crate::model::LinearRegression;
use crate::pipeline::{Pipeline, Stage};

/// Input columns of the automotive dataset, in vector order
pub const FEATURE_COLUMNS: [&str; 7] = [
    "cylinders",
    "displacement",
    "horsepower",
    "weight",
    "acceleration",
    "model year",
    "origin",
];

/// Name of the assembled feature vector column
pub const ASSEMBLED_COL: &str = "features";

/// Name of the standardized feature vector column
pub const SCALED_COL: &str = "scaledFeatures";

/// Build the fixed three-stage list: assembly, scaling, model fit.
///
/// Deterministic and side-effect free. Hyperparameter values are not
/// validated here; the model backend rejects bad values at fit time.
pub fn build_stages(params: LinearParams) -> Vec<Stage> {
    let assembler = VectorAssembler::new(
        FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        ASSEMBLED_COL,
    );
    let scaler = StandardScaler::new(ASSEMBLED_COL, SCALED_COL)
        .with_mean(true)
        .with_std(true);
    let model = LinearRegression::new(params).with_features_col(SCALED_COL);

    vec![
        Stage::Assemble(assembler),
        Stage::Scale(scaler),
        Stage::Fit(model),
    ]
}

impl RegressionVariant {
    /// Compose the runnable pipeline for this variant: the fixed stage list
    /// built from this variant's hyperparameter table.
    pub fn compose(&self) -> Pipeline {
        Pipeline::new(build_stages(self.parameters()))
    }
}
