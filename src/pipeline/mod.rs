//! Pipeline stages and execution
//!
//! A [`Pipeline`] is an inert, ordered description of transform and model
//! stages. [`Pipeline::fit`] runs the stages in order over a data frame,
//! each stage's output column feeding the next stage's input column, and
//! returns a [`PipelineModel`] that can transform new data.

use crate::error::{PipelineError, Result};
use crate::feature::{StandardScaler, VectorAssembler};
use crate::model::LinearRegression;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Name of the prediction column appended by [`PipelineModel::transform`]
pub const PREDICTION_COL: &str = "prediction";

/// Kind of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    /// Combine scalar columns into one vector column
    FeatureAssembly,
    /// Standardize a vector column
    FeatureScaling,
    /// Fit the regression model
    ModelFit,
}

/// A configured (not yet fitted) pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stage {
    /// Feature assembly stage
    Assemble(VectorAssembler),
    /// Feature scaling stage
    Scale(StandardScaler),
    /// Model fit stage
    Fit(LinearRegression),
}

impl Stage {
    /// The kind of this stage
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Assemble(_) => StageKind::FeatureAssembly,
            Stage::Scale(_) => StageKind::FeatureScaling,
            Stage::Fit(_) => StageKind::ModelFit,
        }
    }
}

/// An ordered, inert sequence of pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Create a pipeline from an ordered stage list
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// The configured stages, in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Fit every stage in order over the data frame.
    ///
    /// Transform stages are fitted and applied before the model stage sees
    /// the data. The pipeline itself is not mutated; fitted copies of the
    /// stages move into the returned [`PipelineModel`].
    pub fn fit(&self, df: &DataFrame) -> Result<PipelineModel> {
        let start = Instant::now();
        let mut vectors: HashMap<String, Array2<f64>> = HashMap::new();
        let mut fitted = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            match stage {
                Stage::Assemble(assembler) => {
                    let x = assembler.assemble(df)?;
                    vectors.insert(assembler.output_col().to_string(), x);
                    fitted.push(Stage::Assemble(assembler.clone()));
                }
                Stage::Scale(scaler) => {
                    let x = vector_input(&vectors, scaler.input_col())?;
                    let mut scaler = scaler.clone();
                    let scaled = scaler.fit_transform(x)?;
                    vectors.insert(scaler.output_col().to_string(), scaled);
                    fitted.push(Stage::Scale(scaler));
                }
                Stage::Fit(model) => {
                    let x = vector_input(&vectors, model.features_col())?;
                    let y = label_column(df, model.label_col())?;
                    let mut model = model.clone();
                    model.fit(x, &y)?;
                    fitted.push(Stage::Fit(model));
                }
            }
        }

        info!(
            stages = fitted.len(),
            "pipeline fit completed in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        Ok(PipelineModel { stages: fitted })
    }
}

/// A fitted pipeline, ready to transform new data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineModel {
    stages: Vec<Stage>,
}

impl PipelineModel {
    /// The fitted stages, in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Predict labels for a data frame
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let mut vectors: HashMap<String, Array2<f64>> = HashMap::new();

        for stage in &self.stages {
            match stage {
                Stage::Assemble(assembler) => {
                    let x = assembler.assemble(df)?;
                    vectors.insert(assembler.output_col().to_string(), x);
                }
                Stage::Scale(scaler) => {
                    let x = vector_input(&vectors, scaler.input_col())?;
                    let scaled = scaler.transform(x)?;
                    vectors.insert(scaler.output_col().to_string(), scaled);
                }
                Stage::Fit(model) => {
                    let x = vector_input(&vectors, model.features_col())?;
                    return model.predict(x);
                }
            }
        }

        Err(PipelineError::TrainingError(
            "pipeline has no model stage".to_string(),
        ))
    }

    /// Transform a data frame, appending the prediction column
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let predictions = self.predict(df)?;
        let series = Series::new(PREDICTION_COL.into(), predictions.to_vec());
        let mut result = df.clone();
        result
            .with_column(series)
            .map_err(|e| PipelineError::DataError(e.to_string()))?;
        Ok(result)
    }
}

fn vector_input<'a>(
    vectors: &'a HashMap<String, Array2<f64>>,
    col: &str,
) -> Result<&'a Array2<f64>> {
    vectors
        .get(col)
        .ok_or_else(|| PipelineError::FeatureNotFound(col.to_string()))
}

fn label_column(df: &DataFrame, col: &str) -> Result<Array1<f64>> {
    let column = df
        .column(col)
        .map_err(|_| PipelineError::FeatureNotFound(col.to_string()))?;
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
                PipelineError::DataError(format!("null value in label column '{}'", col))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Array1::from_vec(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegressionVariant;

    fn test_frame() -> DataFrame {
        df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 5.0],
            "b" => &[2.0, 1.0, 4.0, 3.0, 5.0],
            "label" => &[4.0, 5.0, 10.0, 10.0, 15.0]
        )
        .unwrap()
    }

    fn test_stages(params: crate::config::LinearParams) -> Vec<Stage> {
        vec![
            Stage::Assemble(VectorAssembler::new(
                vec!["a".to_string(), "b".to_string()],
                "features",
            )),
            Stage::Scale(StandardScaler::new("features", "scaledFeatures")),
            Stage::Fit(LinearRegression::new(params).with_features_col("scaledFeatures")),
        ]
    }

    #[test]
    fn test_pipeline_fit_and_predict() {
        let params = RegressionVariant::Multiple
            .parameters()
            .with_reg_param(0.0)
            .with_max_iter(500);
        let pipeline = Pipeline::new(test_stages(params));
        let df = test_frame();

        let model = pipeline.fit(&df).unwrap();
        let predictions = model.predict(&df).unwrap();
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_transform_appends_prediction_column() {
        let params = RegressionVariant::Ridge.parameters();
        let pipeline = Pipeline::new(test_stages(params));
        let df = test_frame();

        let model = pipeline.fit(&df).unwrap();
        let transformed = model.transform(&df).unwrap();
        assert!(transformed.column(PREDICTION_COL).is_ok());
        assert_eq!(transformed.height(), df.height());
    }

    #[test]
    fn test_stage_kinds_in_order() {
        let pipeline = Pipeline::new(test_stages(RegressionVariant::Lasso.parameters()));
        let kinds: Vec<StageKind> = pipeline.stages().iter().map(Stage::kind).collect();
        assert_eq!(
            kinds,
            vec![
                StageKind::FeatureAssembly,
                StageKind::FeatureScaling,
                StageKind::ModelFit
            ]
        );
    }

    #[test]
    fn test_missing_label_column_fails() {
        let params = RegressionVariant::Multiple.parameters();
        let stages = vec![
            Stage::Assemble(VectorAssembler::new(vec!["a".to_string()], "features")),
            Stage::Scale(StandardScaler::new("features", "scaledFeatures")),
            Stage::Fit(
                LinearRegression::new(params)
                    .with_features_col("scaledFeatures")
                    .with_label_col("mpg"),
            ),
        ];
        let pipeline = Pipeline::new(stages);
        let df = test_frame();
        let err = pipeline.fit(&df).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureNotFound(_)));
    }

    #[test]
    fn test_miswired_stage_input_fails() {
        let params = RegressionVariant::Multiple.parameters();
        let stages = vec![
            Stage::Assemble(VectorAssembler::new(vec!["a".to_string()], "features")),
            // scaler reads a column no stage produced
            Stage::Scale(StandardScaler::new("assembled", "scaledFeatures")),
            Stage::Fit(LinearRegression::new(params).with_features_col("scaledFeatures")),
        ];
        let pipeline = Pipeline::new(stages);
        let err = pipeline.fit(&test_frame()).unwrap_err();
        assert!(matches!(err, PipelineError::FeatureNotFound(_)));
    }
}
