//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples (0 when `with_mean` is off),
//! and `s` is the population standard deviation (1 when `with_std` is off).
//!
//! Scale-only mode (`with_mean(false)`) keeps non-negative inputs such as
//! one-hot indicators non-negative.
//!
//! # Example
//! ```ignore
//! use student_performance::preprocessing::{Transformer, FittedTransformer, StandardScaler};
//!
//! let fitted = StandardScaler::new().with_mean(false).fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if with_mean = false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature (ones if with_std = false).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    pub fn config(&self) -> &StandardScalerConfig {
        &self.config
    }
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.dim();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::MissingValues(
                "StandardScaler input contains NaN or infinite values".to_string(),
            ));
        }

        let col_mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));

        let std = if self.config.with_std {
            // population std (ddof = 0); constant features keep scale 1
            data.std_axis(Axis(0), 0.0)
                .mapv(|s| if s == 0.0 { 1.0 } else { s })
        } else {
            Array1::ones(cols)
        };

        let mean = if self.config.with_mean {
            col_mean
        } else {
            Array1::zeros(cols)
        };

        Ok(FittedStandardScaler {
            config: self.config.clone(),
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    config: StandardScalerConfig,
    mean: Array1<f64>,
    std: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Get the mean values for each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Get the standard deviation values for each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    fn check_width(&self, data: &Array2<f64>) -> Result<(), PreprocessingError> {
        if data.ncols() != self.n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features,
                got_features: data.ncols(),
            });
        }
        Ok(())
    }

    /// Undo the scaling: `x = z * s + u`.
    pub fn inverse_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        self.check_width(data)?;

        let mut result = data.clone();
        if self.config.with_std {
            result *= &self.std;
        }
        if self.config.with_mean {
            result += &self.mean;
        }
        Ok(result)
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.check_width(data)?;

        let mut result = data.clone();
        if self.config.with_mean {
            result -= &self.mean;
        }
        if self.config.with_std {
            result /= &self.std;
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            config: self.config.clone(),
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(PreprocessingError::SerializationError(format!(
                "StandardScaler parameters do not cover {} features",
                params.n_features
            )));
        }
        Ok(Self {
            config: params.config,
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
            n_features: params.n_features,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0], [0.0, 1.0], [1.0, 3.0]]
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        // Mean: [1/3, 5/3]
        let mean = fitted.mean();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-10);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-10);

        // Population std: [sqrt(2)/3, 2*sqrt(2)/3]
        let std = fitted.std();
        assert!((std[0] - 2.0_f64.sqrt() / 3.0).abs() < 1e-10);
        assert!((std[1] - 2.0 * 2.0_f64.sqrt() / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_standard_scaler_centered_output_has_zero_mean() {
        let data = create_test_data();
        let scaled = StandardScaler::new().fit_transform(&data).unwrap();
        for col in scaled.columns() {
            assert!(col.sum().abs() < 1e-10);
        }
    }

    #[test]
    fn test_scale_only_keeps_sign() {
        let data = create_test_data();
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();

        assert_eq!(fitted.mean().to_vec(), vec![0.0, 0.0]);
        let scaled = fitted.transform(&data).unwrap();
        assert!(scaled.iter().all(|&v| v >= 0.0));
        // x / s for the last row, first column: 1 / (sqrt(2)/3)
        assert!((scaled[[2, 0]] - 3.0 / 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_constant_feature_scale_is_one() {
        let data = array![[5.0], [5.0], [5.0]];
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();
        assert_eq!(fitted.std()[0], 1.0);
        assert_eq!(fitted.transform(&data).unwrap(), data);
    }

    #[test]
    fn test_inverse_transform_round_trip() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();
        let restored = fitted
            .inverse_transform(&fitted.transform(&data).unwrap())
            .unwrap();
        for (a, b) in data.iter().zip(restored.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rejects_nan_input() {
        let data = array![[1.0], [f64::NAN]];
        assert!(matches!(
            StandardScaler::new().fit(&data),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_feature_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();
        assert!(matches!(
            fitted.transform(&array![[1.0, 2.0, 3.0]]),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_params_round_trip() {
        let data = create_test_data();
        let fitted = StandardScaler::new().with_mean(false).fit(&data).unwrap();
        let restored = FittedStandardScaler::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            fitted.transform(&data).unwrap(),
            restored.transform(&data).unwrap()
        );
    }
}
