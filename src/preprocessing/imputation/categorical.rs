//! Imputer for categorical (string) features.
//!
//! Fills `None` entries with the most frequent category of the column, or with
//! a constant label. The output has no missing entries left.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy for imputing missing categories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CategoricalStrategy {
    /// Most frequent category; ties resolve to the lexicographically smallest.
    #[default]
    MostFrequent,
    /// A fixed label.
    Constant(String),
}

/// Serializable parameters for a fitted CategoricalImputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoricalImputerParams {
    pub strategy: CategoricalStrategy,
    /// Fill value for each feature.
    pub statistics_: Vec<String>,
    pub n_features: usize,
}

/// CategoricalImputer transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct CategoricalImputer {
    strategy: CategoricalStrategy,
}

impl CategoricalImputer {
    pub fn new(strategy: CategoricalStrategy) -> Self {
        Self { strategy }
    }
}

fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    // BTreeMap iterates in key order, so the first maximum is the smallest label.
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

impl Transformer for CategoricalImputer {
    type Input = Array2<Option<String>>;
    type Output = Array2<Option<String>>;
    type Params = CategoricalImputerParams;
    type Fitted = FittedCategoricalImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit CategoricalImputer on empty data".to_string(),
            ));
        }

        let statistics_ = data
            .columns()
            .into_iter()
            .enumerate()
            .map(|(col, column)| match &self.strategy {
                CategoricalStrategy::Constant(label) => Ok(label.clone()),
                CategoricalStrategy::MostFrequent => {
                    mode(column.iter().filter_map(|v| v.as_deref())).ok_or_else(|| {
                        PreprocessingError::EmptyData(format!(
                            "column {col} has no observed categories"
                        ))
                    })
                }
            })
            .collect::<Result<Vec<String>, _>>()?;

        Ok(FittedCategoricalImputer {
            strategy: self.strategy.clone(),
            n_features: data.ncols(),
            statistics_,
        })
    }
}

/// Fitted CategoricalImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCategoricalImputer {
    strategy: CategoricalStrategy,
    statistics_: Vec<String>,
    n_features: usize,
}

impl FittedCategoricalImputer {
    pub fn statistics(&self) -> &[String] {
        &self.statistics_
    }
}

impl FittedTransformer for FittedCategoricalImputer {
    type Input = Array2<Option<String>>;
    type Output = Array2<Option<String>>;
    type Params = CategoricalImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (mut column, fill) in result.columns_mut().into_iter().zip(&self.statistics_) {
            for value in column.iter_mut() {
                if value.is_none() {
                    *value = Some(fill.clone());
                }
            }
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        CategoricalImputerParams {
            strategy: self.strategy.clone(),
            statistics_: self.statistics_.clone(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.statistics_.len() != params.n_features {
            return Err(PreprocessingError::SerializationError(format!(
                "CategoricalImputer has {} statistics for {} features",
                params.statistics_.len(),
                params.n_features
            )));
        }
        Ok(Self {
            strategy: params.strategy,
            statistics_: params.statistics_,
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}
