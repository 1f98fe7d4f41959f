use crate::error::{Error, Result};
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use crate::preprocessing::PreprocessingError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and bias of a linear model.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Persisted form of [`LinearParams`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl From<SerializableLinearParams> for LinearParams {
    fn from(value: SerializableLinearParams) -> Self {
        Self {
            weights: Array1::from(value.weights),
            bias: value.bias,
        }
    }
}

impl ParamOps for LinearParams {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: &self.weights + &other.weights,
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: f64) -> Self {
        Self {
            weights: &self.weights * scalar,
            bias: self.bias * scalar,
        }
    }

    fn max_abs(&self) -> f64 {
        self.weights
            .iter()
            .fold(self.bias.abs(), |acc, w| acc.max(w.abs()))
    }
}

/// Linear regression `y = X·w + b`, parametrized by training state.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

pub type LinearRegression = LinearModel<Unfitted>;
pub type FittedLinearRegression = LinearModel<Fitted>;

impl LinearModel<Unfitted> {
    /// Zero-initialized model over `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Array1::zeros(n_features),
                bias: 0.0,
            },
            _state: PhantomData,
        }
    }
}

impl LinearModel<Fitted> {
    /// Create a new fitted linear model from params.
    pub fn from_linear_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type ParamsRepr = SerializableLinearParams;

    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>> {
        if input.ncols() != self.params.weights.len() {
            return Err(Error::Schema(PreprocessingError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: input.ncols(),
            }));
        }
        Ok(input.dot(&self.params.weights) + self.params.bias)
    }

    fn n_features_in(&self) -> usize {
        self.params.weights.len()
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        if !params.bias.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::Model(
                "linear model parameters contain non-finite values".to_string(),
            ));
        }
        Ok(Self::from_linear_params(params.into()))
    }
}

impl TrainableModel for LinearModel<Unfitted> {
    type Params = LinearParams;
    type Output = LinearModel<Fitted>;

    fn forward(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.params.weights) + self.params.bias
    }

    fn backward(&self, x: &Array2<f64>, grad_output: &Array1<f64>) -> Self::Params {
        LinearParams {
            weights: x.t().dot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: Self::Params) {
        self.params = params;
    }

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::from_linear_params(self.params)
    }
}
