//! Regression pipelines for the auto-mpg dataset
//!
//! This crate builds comparable linear-regression pipelines (ordinary
//! elastic-net blend, ridge, and lasso) over the seven-feature automotive
//! schema. Each variant supplies a fixed hyperparameter table; composing a
//! variant yields the same three-stage pipeline (feature assembly,
//! standardization, model fit) so the variants differ only in their
//! regularization mix.
//!
//! # Modules
//! - [`config`] - Hyperparameter tables and the regression variants
//! - [`composer`] - The fixed auto-mpg stage list
//! - [`pipeline`] - Stage descriptors, pipeline fit/transform
//! - [`feature`] - Vector assembly and standardization
//! - [`model`] - The elastic-net linear regression solver
//! - [`evaluation`] - Regression metrics
//! - [`data`] - Dataset loading
//!
//! # Example
//!
//! ```no_run
//! use autompg_regression::prelude::*;
//!
//! # fn main() -> autompg_regression::Result<()> {
//! let df = data::load_auto_mpg("auto-mpg.csv")?;
//! let model = RegressionVariant::Ridge.compose().fit(&df)?;
//! let predictions = model.predict(&df)?;
//! # Ok(())
//! # }
//! ```

pub mod error;

pub mod composer;
pub mod config;
pub mod data;
pub mod evaluation;
pub mod feature;
pub mod model;
pub mod pipeline;

pub use error::{PipelineError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::composer::{build_stages, ASSEMBLED_COL, FEATURE_COLUMNS, SCALED_COL};
    pub use crate::config::{LinearParams, Loss, RegressionVariant};
    pub use crate::data;
    pub use crate::error::{PipelineError, Result};
    pub use crate::evaluation::RegressionMetrics;
    pub use crate::feature::{StandardScaler, VectorAssembler};
    pub use crate::model::LinearRegression;
    pub use crate::pipeline::{Pipeline, PipelineModel, Stage, StageKind, PREDICTION_COL};
}
