//! One-hot encoding for categorical features.
//!
//! Transforms string categories into one-hot (dummy) indicator columns.

use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder for categorical features.
///
/// Each input column is treated as a categorical feature; the encoder learns
/// the distinct categories of every column during fitting, sorted
/// lexicographically, and emits one indicator column per category.
///
/// # Example
/// ```ignore
/// use student_performance::preprocessing::{OneHotEncoder, Transformer, FittedTransformer};
///
/// // Input: 3 samples with 1 categorical feature each
/// let data = array![[Some("red".to_string())], [Some("green".into())], [Some("blue".into())]];
///
/// let fitted = OneHotEncoder::new().fit(&data)?;
///
/// // Output: 3x3 one-hot matrix, columns [blue, green, red]
/// let encoded = fitted.transform(&data)?;
/// // [[0, 0, 1],
/// //  [0, 1, 0],
/// //  [1, 0, 0]]
/// ```
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Categories (sorted unique values) for each input column.
    pub categories_: Vec<Vec<String>>,
    /// Names of the input columns, used in error messages and output names.
    pub feature_names_in: Vec<String>,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    categories_: Vec<Vec<String>>,
    feature_names_in: Vec<String>,
    n_features_out: usize,
    handle_unknown: HandleUnknown,
}

impl FittedOneHotEncoder {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories_
    }

    /// Get the number of output features (sum of per-column cardinalities).
    pub fn n_features_out(&self) -> usize {
        self.n_features_out
    }

    /// Replace the positional input names (`x0`, `x1`, ...) with real column names.
    pub fn with_feature_names(mut self, names: &[String]) -> Result<Self, PreprocessingError> {
        if names.len() != self.categories_.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories_.len(),
                got_features: names.len(),
            });
        }
        self.feature_names_in = names.to_vec();
        Ok(self)
    }

    /// Output column names, `<input>_<category>`.
    pub fn feature_names_out(&self) -> Vec<String> {
        self.feature_names_in
            .iter()
            .zip(&self.categories_)
            .flat_map(|(name, cats)| cats.iter().map(move |c| format!("{name}_{c}")))
            .collect()
    }
}

impl Transformer for OneHotEncoder {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut categories_ = Vec::with_capacity(data.ncols());
        for (col, column) in data.columns().into_iter().enumerate() {
            let mut cats = BTreeSet::new();
            for (row, value) in column.iter().enumerate() {
                let value = value.as_deref().ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "OneHotEncoder got a missing value at ({row}, {col}); impute first"
                    ))
                })?;
                cats.insert(value.to_string());
            }
            categories_.push(cats.into_iter().collect::<Vec<_>>());
        }

        Ok(FittedOneHotEncoder::from_parts(
            categories_,
            (0..data.ncols()).map(|i| format!("x{i}")).collect(),
            self.handle_unknown,
        ))
    }
}

impl FittedOneHotEncoder {
    fn from_parts(
        categories_: Vec<Vec<String>>,
        feature_names_in: Vec<String>,
        handle_unknown: HandleUnknown,
    ) -> Self {
        let n_features_out = categories_.iter().map(Vec::len).sum();
        Self {
            categories_,
            feature_names_in,
            n_features_out,
            handle_unknown,
        }
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Input = Array2<Option<String>>;
    type Output = Array2<f64>;
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.categories_.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.categories_.len(),
                got_features: data.ncols(),
            });
        }

        let mut result = Array2::<f64>::zeros((data.nrows(), self.n_features_out));

        for (row, record) in data.rows().into_iter().enumerate() {
            let mut offset = 0;
            for (col, value) in record.iter().enumerate() {
                let cats = &self.categories_[col];
                let value = value.as_deref().ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "OneHotEncoder got a missing value in column '{}'",
                        self.feature_names_in[col]
                    ))
                })?;

                match cats.binary_search_by(|c| c.as_str().cmp(value)) {
                    Ok(idx) => result[[row, offset + idx]] = 1.0,
                    Err(_) if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PreprocessingError::UnknownCategory {
                            column: self.feature_names_in[col].clone(),
                            value: value.to_string(),
                        });
                    }
                    // With Ignore, leave as zeros
                    Err(_) => {}
                }

                offset += cats.len();
            }
        }

        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories_: self.categories_.clone(),
            feature_names_in: self.feature_names_in.clone(),
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.feature_names_in.len() != params.categories_.len() {
            return Err(PreprocessingError::SerializationError(
                "OneHotEncoder feature names do not match its categories".to_string(),
            ));
        }
        Ok(Self::from_parts(
            params.categories_,
            params.feature_names_in,
            params.handle_unknown,
        ))
    }

    fn n_features_in(&self) -> usize {
        self.categories_.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_one_hot_encoder_single_column() {
        let data = array![[s("red")], [s("green")], [s("blue")]];
        let fitted = OneHotEncoder::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec!["blue", "green", "red"]);

        let encoded = fitted.transform(&data).unwrap();
        assert_eq!(
            encoded,
            array![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn test_one_hot_encoder_multiple_columns_offsets() {
        let data = array![
            [s("female"), s("standard")],
            [s("male"), s("free/reduced")],
            [s("female"), s("free/reduced")],
        ];
        let fitted = OneHotEncoder::new().fit(&data).unwrap();
        assert_eq!(fitted.n_features_out(), 4);

        let encoded = fitted.transform(&array![[s("male"), s("standard")]]).unwrap();
        // [female, male, free/reduced, standard]
        assert_eq!(encoded, array![[0.0, 1.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_unknown_category_error_names_column() {
        let data = array![[s("none")], [s("completed")]];
        let fitted = OneHotEncoder::new()
            .fit(&data)
            .unwrap()
            .with_feature_names(&["test preparation course".to_string()])
            .unwrap();

        let err = fitted.transform(&array![[s("partial")]]).unwrap_err();
        match err {
            PreprocessingError::UnknownCategory { column, value } => {
                assert_eq!(column, "test preparation course");
                assert_eq!(value, "partial");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_category_ignore_gives_zeros() {
        let data = array![[s("a")], [s("b")]];
        let fitted = OneHotEncoder::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&data)
            .unwrap();
        assert_eq!(fitted.transform(&array![[s("c")]]).unwrap(), array![[0.0, 0.0]]);
    }

    #[test]
    fn test_missing_value_rejected() {
        let data = array![[s("a")], [None]];
        assert!(matches!(
            OneHotEncoder::new().fit(&data),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_feature_names_out() {
        let data = array![[s("female"), s("group B")], [s("male"), s("group A")]];
        let fitted = OneHotEncoder::new()
            .fit(&data)
            .unwrap()
            .with_feature_names(&["gender".to_string(), "race/ethnicity".to_string()])
            .unwrap();
        assert_eq!(
            fitted.feature_names_out(),
            vec![
                "gender_female",
                "gender_male",
                "race/ethnicity_group A",
                "race/ethnicity_group B"
            ]
        );
    }

    #[test]
    fn test_params_round_trip() {
        let data = array![[s("x")], [s("y")]];
        let fitted = OneHotEncoder::new().fit(&data).unwrap();
        let restored = FittedOneHotEncoder::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            fitted.transform(&data).unwrap(),
            restored.transform(&data).unwrap()
        );
    }
}
