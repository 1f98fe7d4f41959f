//! ColumnTransformer implementation.
//!
//! Applies a named pipeline to each subset of table columns and concatenates
//! the results, in branch order.

use crate::dataset::{Column, Table};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::pipeline::{Block, BlockData, FittedPipeline, Pipeline, PipelineParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Whether a branch reads numeric or categorical columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    fn of(column: &Column) -> Self {
        match column {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

/// Resolve the kind shared by every column of a branch.
fn branch_kind(table: &Table, columns: &[String]) -> Result<ColumnKind, PreprocessingError> {
    let mut kind = None;
    for name in columns {
        let column = table
            .column(name)
            .ok_or_else(|| PreprocessingError::MissingColumn(name.clone()))?;
        let this = ColumnKind::of(column);
        match kind {
            None => kind = Some(this),
            Some(k) if k != this => {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "branch mixes numeric and categorical columns at '{name}'"
                )))
            }
            Some(_) => {}
        }
    }
    kind.ok_or_else(|| {
        PreprocessingError::InvalidParameter("branch selects no columns".to_string())
    })
}

fn extract_block(
    table: &Table,
    columns: &[String],
    kind: ColumnKind,
) -> Result<Block, PreprocessingError> {
    let data = match kind {
        ColumnKind::Numeric => BlockData::Numeric(table.numeric_matrix(columns)?),
        ColumnKind::Categorical => BlockData::Categorical(table.categorical_matrix(columns)?),
    };
    Ok(Block {
        names: columns.to_vec(),
        data,
    })
}

/// ColumnTransformer applies a different pipeline to different columns.
///
/// Columns of the table not selected by any branch are dropped.
///
/// # Example
/// ```ignore
/// use student_performance::preprocessing::{ColumnTransformer, Pipeline, Transformer};
///
/// let ct = ColumnTransformer::new()
///     .add("numerical_pipeline", numeric, ["reading score", "writing score"])
///     .add("categorical_pipeline", categorical, ["gender", "lunch"]);
///
/// let fitted = ct.fit(&table)?;
/// let features = fitted.transform(&table)?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ColumnTransformer {
    branches: Vec<(String, Pipeline, Vec<String>)>,
}

impl ColumnTransformer {
    /// Create a new empty ColumnTransformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named branch applying `pipeline` to `columns`.
    pub fn add<I, S>(mut self, name: impl Into<String>, pipeline: Pipeline, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches.push((
            name.into(),
            pipeline,
            columns.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Get the number of branches.
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// `(branch name, step names, columns)` for each branch, in order.
    pub fn branches(&self) -> Vec<(&str, Vec<&str>, &[String])> {
        self.branches
            .iter()
            .map(|(name, pipeline, cols)| (name.as_str(), pipeline.step_names(), cols.as_slice()))
            .collect()
    }
}

/// Serializable parameters for one fitted branch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchParams {
    pub name: String,
    pub columns: Vec<String>,
    pub kind: ColumnKind,
    pub pipeline: PipelineParams,
}

/// Serializable parameters for a fitted ColumnTransformer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnTransformerParams {
    pub branches: Vec<BranchParams>,
}

#[derive(Clone, Debug)]
struct FittedBranch {
    name: String,
    columns: Vec<String>,
    kind: ColumnKind,
    pipeline: FittedPipeline,
}

/// Fitted ColumnTransformer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedColumnTransformer {
    branches: Vec<FittedBranch>,
}

impl FittedColumnTransformer {
    /// Get the number of output features.
    pub fn n_features_out(&self) -> usize {
        self.branches
            .iter()
            .map(|b| b.pipeline.n_features_out())
            .sum()
    }

    /// Output column names, `<branch>__<column>`.
    pub fn feature_names_out(&self) -> Vec<String> {
        self.branches
            .iter()
            .flat_map(|b| {
                b.pipeline
                    .feature_names_out()
                    .iter()
                    .map(move |f| format!("{}__{}", b.name, f))
            })
            .collect()
    }

    /// Input column names, in branch order.
    pub fn columns_in(&self) -> Vec<&str> {
        self.branches
            .iter()
            .flat_map(|b| b.columns.iter().map(String::as_str))
            .collect()
    }

    /// Get a fitted branch pipeline by name.
    pub fn named_branch(&self, name: &str) -> Option<&FittedPipeline> {
        self.branches
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.pipeline)
    }
}

impl Transformer for ColumnTransformer {
    type Input = Table;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;
    type Fitted = FittedColumnTransformer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if self.branches.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "Cannot fit empty ColumnTransformer".to_string(),
            ));
        }
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit ColumnTransformer on empty data".to_string(),
            ));
        }

        let mut branches = Vec::with_capacity(self.branches.len());
        for (name, pipeline, columns) in &self.branches {
            let kind = branch_kind(data, columns)?;
            let block = extract_block(data, columns, kind)?;
            let fitted = pipeline.fit(&block)?;
            tracing::debug!(
                branch = %name,
                columns = columns.len(),
                features_out = fitted.n_features_out(),
                "fitted branch"
            );
            branches.push(FittedBranch {
                name: name.clone(),
                columns: columns.clone(),
                kind,
                pipeline: fitted,
            });
        }

        Ok(FittedColumnTransformer { branches })
    }
}

impl FittedTransformer for FittedColumnTransformer {
    type Input = Table;
    type Output = Array2<f64>;
    type Params = ColumnTransformerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        // Every branch column must be present with its fitted kind, even with no rows.
        let blocks = self
            .branches
            .iter()
            .map(|b| extract_block(data, &b.columns, b.kind))
            .collect::<Result<Vec<_>, _>>()?;

        if data.n_rows() == 0 {
            return Ok(Array2::zeros((0, self.n_features_out())));
        }

        let outputs = self
            .branches
            .iter()
            .zip(&blocks)
            .map(|(b, block)| b.pipeline.transform(block))
            .collect::<Result<Vec<_>, _>>()?;

        let views: Vec<_> = outputs.iter().map(|m| m.view()).collect();
        concatenate(Axis(1), &views).map_err(|e| PreprocessingError::InvalidShape {
            expected: "branch outputs with equal row counts".to_string(),
            got: e.to_string(),
        })
    }

    fn extract_params(&self) -> Self::Params {
        ColumnTransformerParams {
            branches: self
                .branches
                .iter()
                .map(|b| BranchParams {
                    name: b.name.clone(),
                    columns: b.columns.clone(),
                    kind: b.kind,
                    pipeline: b.pipeline.extract_params(),
                })
                .collect(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.branches.is_empty() {
            return Err(PreprocessingError::SerializationError(
                "ColumnTransformer parameters contain no branches".to_string(),
            ));
        }
        let branches = params
            .branches
            .into_iter()
            .map(|b| {
                if b.pipeline.n_features != b.columns.len() {
                    return Err(PreprocessingError::SerializationError(format!(
                        "branch '{}' covers {} columns but its pipeline expects {}",
                        b.name,
                        b.columns.len(),
                        b.pipeline.n_features
                    )));
                }
                Ok(FittedBranch {
                    name: b.name,
                    columns: b.columns,
                    kind: b.kind,
                    pipeline: FittedPipeline::from_params(b.pipeline)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { branches })
    }

    fn n_features_in(&self) -> usize {
        self.branches.iter().map(|b| b.columns.len()).sum()
    }
}
