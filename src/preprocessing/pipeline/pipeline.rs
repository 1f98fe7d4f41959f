//! Pipeline for chaining transformers.
//!
//! A Pipeline chains named steps; the output of one step becomes the input of
//! the next. Steps operate on a [`BlockData`], which is either a numeric or a
//! categorical matrix, so a categorical branch can go
//! `imputer → encoder → scaler` and come out numeric.
//!
//! # Example
//! ```ignore
//! use student_performance::preprocessing::{
//!     Pipeline, CategoricalImputer, OneHotEncoder, StandardScaler, Transformer
//! };
//!
//! let pipeline = Pipeline::new()
//!     .add_categorical_imputer("imputer", CategoricalImputer::default())
//!     .add_one_hot_encoder("encoder", OneHotEncoder::new())
//!     .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));
//!
//! let fitted = pipeline.fit(&block)?;
//! let transformed = fitted.transform(&block)?;
//! ```

use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{
    CategoricalImputer, CategoricalImputerParams, FittedCategoricalImputer, FittedSimpleImputer,
    SimpleImputer, SimpleImputerParams,
};
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// The data flowing between pipeline steps.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockData {
    Numeric(Array2<f64>),
    Categorical(Array2<Option<String>>),
}

impl BlockData {
    pub fn kind(&self) -> &'static str {
        match self {
            BlockData::Numeric(_) => "numeric",
            BlockData::Categorical(_) => "categorical",
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        match self {
            BlockData::Numeric(m) => m.dim(),
            BlockData::Categorical(m) => m.dim(),
        }
    }
}

/// A set of named columns handed to a pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub names: Vec<String>,
    pub data: BlockData,
}

fn kind_error(step: &str, expected: &'static str, got: &BlockData) -> PreprocessingError {
    PreprocessingError::ColumnKind {
        column: format!("<input of {step}>"),
        expected,
        got: got.kind(),
    }
}

/// A step in the unfitted pipeline.
#[derive(Clone, Debug)]
pub enum UnfittedStepEnum {
    SimpleImputer(SimpleImputer),
    CategoricalImputer(CategoricalImputer),
    OneHotEncoder(OneHotEncoder),
    StandardScaler(StandardScaler),
}

/// A fitted step in the pipeline.
#[derive(Clone, Debug)]
pub enum PipelineStepEnum {
    SimpleImputer(FittedSimpleImputer),
    CategoricalImputer(FittedCategoricalImputer),
    OneHotEncoder(FittedOneHotEncoder),
    StandardScaler(FittedStandardScaler),
}

/// Serializable form of a fitted step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StepParams {
    SimpleImputer(SimpleImputerParams),
    CategoricalImputer(CategoricalImputerParams),
    OneHotEncoder(OneHotEncoderParams),
    StandardScaler(StandardScalerParams),
}

impl UnfittedStepEnum {
    fn fit(&self, data: &BlockData, names: &[String]) -> Result<PipelineStepEnum, PreprocessingError> {
        match (self, data) {
            (UnfittedStepEnum::SimpleImputer(t), BlockData::Numeric(m)) => {
                t.fit(m).map(PipelineStepEnum::SimpleImputer)
            }
            (UnfittedStepEnum::StandardScaler(t), BlockData::Numeric(m)) => {
                t.fit(m).map(PipelineStepEnum::StandardScaler)
            }
            (UnfittedStepEnum::CategoricalImputer(t), BlockData::Categorical(m)) => {
                t.fit(m).map(PipelineStepEnum::CategoricalImputer)
            }
            (UnfittedStepEnum::OneHotEncoder(t), BlockData::Categorical(m)) => t
                .fit(m)?
                .with_feature_names(names)
                .map(PipelineStepEnum::OneHotEncoder),
            (UnfittedStepEnum::SimpleImputer(_), other)
            | (UnfittedStepEnum::StandardScaler(_), other) => {
                Err(kind_error(self.step_name(), "numeric", other))
            }
            (UnfittedStepEnum::CategoricalImputer(_), other)
            | (UnfittedStepEnum::OneHotEncoder(_), other) => {
                Err(kind_error(self.step_name(), "categorical", other))
            }
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            UnfittedStepEnum::SimpleImputer(_) => "SimpleImputer",
            UnfittedStepEnum::CategoricalImputer(_) => "CategoricalImputer",
            UnfittedStepEnum::OneHotEncoder(_) => "OneHotEncoder",
            UnfittedStepEnum::StandardScaler(_) => "StandardScaler",
        }
    }
}

impl PipelineStepEnum {
    /// Transform the data.
    pub fn transform_step(&self, data: &BlockData) -> Result<BlockData, PreprocessingError> {
        match (self, data) {
            (PipelineStepEnum::SimpleImputer(t), BlockData::Numeric(m)) => {
                t.transform(m).map(BlockData::Numeric)
            }
            (PipelineStepEnum::StandardScaler(t), BlockData::Numeric(m)) => {
                t.transform(m).map(BlockData::Numeric)
            }
            (PipelineStepEnum::CategoricalImputer(t), BlockData::Categorical(m)) => {
                t.transform(m).map(BlockData::Categorical)
            }
            (PipelineStepEnum::OneHotEncoder(t), BlockData::Categorical(m)) => {
                t.transform(m).map(BlockData::Numeric)
            }
            (PipelineStepEnum::SimpleImputer(_), other)
            | (PipelineStepEnum::StandardScaler(_), other) => {
                Err(kind_error(self.step_name(), "numeric", other))
            }
            (PipelineStepEnum::CategoricalImputer(_), other)
            | (PipelineStepEnum::OneHotEncoder(_), other) => {
                Err(kind_error(self.step_name(), "categorical", other))
            }
        }
    }

    /// Get the step name for debugging.
    pub fn step_name(&self) -> &'static str {
        match self {
            PipelineStepEnum::SimpleImputer(_) => "SimpleImputer",
            PipelineStepEnum::CategoricalImputer(_) => "CategoricalImputer",
            PipelineStepEnum::OneHotEncoder(_) => "OneHotEncoder",
            PipelineStepEnum::StandardScaler(_) => "StandardScaler",
        }
    }

    /// Output column names given the names of the step's input columns.
    fn names_out(&self, names_in: Vec<String>) -> Vec<String> {
        match self {
            PipelineStepEnum::OneHotEncoder(t) => t.feature_names_out(),
            _ => names_in,
        }
    }

    fn extract_params(&self) -> StepParams {
        match self {
            PipelineStepEnum::SimpleImputer(t) => StepParams::SimpleImputer(t.extract_params()),
            PipelineStepEnum::CategoricalImputer(t) => {
                StepParams::CategoricalImputer(t.extract_params())
            }
            PipelineStepEnum::OneHotEncoder(t) => StepParams::OneHotEncoder(t.extract_params()),
            PipelineStepEnum::StandardScaler(t) => StepParams::StandardScaler(t.extract_params()),
        }
    }

    fn from_params(params: StepParams) -> Result<Self, PreprocessingError> {
        Ok(match params {
            StepParams::SimpleImputer(p) => {
                PipelineStepEnum::SimpleImputer(FittedSimpleImputer::from_params(p)?)
            }
            StepParams::CategoricalImputer(p) => {
                PipelineStepEnum::CategoricalImputer(FittedCategoricalImputer::from_params(p)?)
            }
            StepParams::OneHotEncoder(p) => {
                PipelineStepEnum::OneHotEncoder(FittedOneHotEncoder::from_params(p)?)
            }
            StepParams::StandardScaler(p) => {
                PipelineStepEnum::StandardScaler(FittedStandardScaler::from_params(p)?)
            }
        })
    }
}

/// Pipeline transformer (unfitted).
///
/// Chains multiple named transformers together.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, UnfittedStepEnum)>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a generic step.
    pub fn add(mut self, name: impl Into<String>, step: UnfittedStepEnum) -> Self {
        self.steps.push((name.into(), step));
        self
    }

    /// Add a SimpleImputer to the pipeline.
    pub fn add_simple_imputer(self, name: impl Into<String>, imputer: SimpleImputer) -> Self {
        self.add(name, UnfittedStepEnum::SimpleImputer(imputer))
    }

    /// Add a CategoricalImputer to the pipeline.
    pub fn add_categorical_imputer(
        self,
        name: impl Into<String>,
        imputer: CategoricalImputer,
    ) -> Self {
        self.add(name, UnfittedStepEnum::CategoricalImputer(imputer))
    }

    /// Add a OneHotEncoder to the pipeline.
    pub fn add_one_hot_encoder(self, name: impl Into<String>, encoder: OneHotEncoder) -> Self {
        self.add(name, UnfittedStepEnum::OneHotEncoder(encoder))
    }

    /// Add a StandardScaler to the pipeline.
    pub fn add_standard_scaler(self, name: impl Into<String>, scaler: StandardScaler) -> Self {
        self.add(name, UnfittedStepEnum::StandardScaler(scaler))
    }

    /// Get the number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Transformer for Pipeline {
    type Input = Block;
    type Output = Array2<f64>;
    type Params = PipelineParams;
    type Fitted = FittedPipeline;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.steps.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit an empty pipeline".to_string(),
            ));
        }

        let (rows, cols) = data.data.dim();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit pipeline on empty data".to_string(),
            ));
        }
        if cols != data.names.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} named columns", data.names.len()),
                got: format!("{cols} columns"),
            });
        }

        let mut fitted_steps = Vec::with_capacity(self.steps.len());
        let mut current = data.data.clone();
        let mut names = data.names.clone();

        for (name, step) in &self.steps {
            let fitted = step.fit(&current, &names)?;
            current = fitted.transform_step(&current)?;
            names = fitted.names_out(names);
            fitted_steps.push((name.clone(), fitted));
        }

        if !matches!(current, BlockData::Numeric(_)) {
            return Err(PreprocessingError::InvalidParameter(
                "pipeline must end with a numeric output; add an encoder step".to_string(),
            ));
        }

        Ok(FittedPipeline {
            steps: fitted_steps,
            n_features: cols,
            feature_names_out: names,
        })
    }
}

/// Serializable representation of a fitted pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Named steps in order.
    pub steps: Vec<(String, StepParams)>,
    /// Number of features seen during fit.
    pub n_features: usize,
    /// Output column names.
    pub feature_names_out: Vec<String>,
}

/// Fitted Pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline {
    steps: Vec<(String, PipelineStepEnum)>,
    n_features: usize,
    feature_names_out: Vec<String>,
}

impl FittedPipeline {
    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get a fitted step by name.
    pub fn named_step(&self, name: &str) -> Option<&PipelineStepEnum> {
        self.steps
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, step)| step)
    }

    /// `(step name, transformer name)` pairs, in order.
    pub fn step_names(&self) -> Vec<(&str, &'static str)> {
        self.steps
            .iter()
            .map(|(name, step)| (name.as_str(), step.step_name()))
            .collect()
    }

    pub fn n_features_out(&self) -> usize {
        self.feature_names_out.len()
    }

    pub fn feature_names_out(&self) -> &[String] {
        &self.feature_names_out
    }
}

impl FittedTransformer for FittedPipeline {
    type Input = Block;
    type Output = Array2<f64>;
    type Params = PipelineParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (_, cols) = data.data.dim();
        if cols != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: cols,
            });
        }

        let mut current = data.data.clone();
        for (_, step) in &self.steps {
            current = step.transform_step(&current)?;
        }

        match current {
            BlockData::Numeric(m) => Ok(m),
            other => Err(PreprocessingError::ColumnKind {
                column: "<pipeline output>".to_string(),
                expected: "numeric",
                got: other.kind(),
            }),
        }
    }

    fn extract_params(&self) -> Self::Params {
        PipelineParams {
            steps: self
                .steps
                .iter()
                .map(|(name, step)| (name.clone(), step.extract_params()))
                .collect(),
            n_features: self.n_features,
            feature_names_out: self.feature_names_out.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let steps = params
            .steps
            .into_iter()
            .map(|(name, p)| PipelineStepEnum::from_params(p).map(|step| (name, step)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            steps,
            n_features: params.n_features,
            feature_names_out: params.feature_names_out,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::imputation::ImputeStrategy;
    use ndarray::array;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn numeric_block() -> Block {
        Block {
            names: vec!["reading score".into(), "writing score".into()],
            data: BlockData::Numeric(array![[72.0, 74.0], [f64::NAN, 88.0], [90.0, 95.0]]),
        }
    }

    fn categorical_block() -> Block {
        Block {
            names: vec!["lunch".into()],
            data: BlockData::Categorical(array![[s("standard")], [None], [s("free/reduced")], [s("standard")]]),
        }
    }

    #[test]
    fn test_numeric_pipeline_impute_then_scale() {
        let pipeline = Pipeline::new()
            .add_simple_imputer("imputer", SimpleImputer::new(ImputeStrategy::Median))
            .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));

        let fitted = pipeline.fit(&numeric_block()).unwrap();
        assert_eq!(fitted.len(), 2);
        assert_eq!(
            fitted.step_names(),
            vec![("imputer", "SimpleImputer"), ("scaler", "StandardScaler")]
        );

        let out = fitted.transform(&numeric_block()).unwrap();
        assert_eq!(out.dim(), (3, 2));
        assert!(out.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_categorical_pipeline_outputs_numeric() {
        let pipeline = Pipeline::new()
            .add_categorical_imputer("imputer", CategoricalImputer::default())
            .add_one_hot_encoder("encoder", OneHotEncoder::new())
            .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));

        let fitted = pipeline.fit(&categorical_block()).unwrap();
        assert_eq!(
            fitted.feature_names_out(),
            &["lunch_free/reduced".to_string(), "lunch_standard".to_string()]
        );

        let out = fitted.transform(&categorical_block()).unwrap();
        assert_eq!(out.dim(), (4, 2));
        // Row 1 was imputed with the mode "standard"
        assert_eq!(out[[1, 0]], 0.0);
        assert!(out[[1, 1]] > 0.0);
    }

    #[test]
    fn test_pipeline_wrong_step_kind() {
        let pipeline = Pipeline::new()
            .add_simple_imputer("imputer", SimpleImputer::new(ImputeStrategy::Median));
        assert!(matches!(
            pipeline.fit(&categorical_block()),
            Err(PreprocessingError::ColumnKind { .. })
        ));
    }

    #[test]
    fn test_pipeline_must_end_numeric() {
        let pipeline =
            Pipeline::new().add_categorical_imputer("imputer", CategoricalImputer::default());
        assert!(matches!(
            pipeline.fit(&categorical_block()),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_pipeline() {
        assert!(Pipeline::new().fit(&numeric_block()).is_err());
    }

    #[test]
    fn test_params_round_trip() {
        let pipeline = Pipeline::new()
            .add_categorical_imputer("imputer", CategoricalImputer::default())
            .add_one_hot_encoder("encoder", OneHotEncoder::new())
            .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));
        let fitted = pipeline.fit(&categorical_block()).unwrap();
        let restored = FittedPipeline::from_params(fitted.extract_params()).unwrap();

        assert_eq!(restored.feature_names_out(), fitted.feature_names_out());
        assert!(restored.named_step("encoder").is_some());
        assert_eq!(
            fitted.transform(&categorical_block()).unwrap(),
            restored.transform(&categorical_block()).unwrap()
        );
    }
}
