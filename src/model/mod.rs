//! Regression models.
//!
//! Training goes through [`TrainableModel`] (forward / backward / parameter
//! update); prediction goes through [`InferenceModel`], which is all the
//! prediction service needs to know about a model.

pub mod linear;
pub mod state;

pub use linear::{FittedLinearRegression, LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

use crate::artifact;
use crate::error::Result;
use crate::serialization::SerializableParams;
use ndarray::{Array1, Array2};
use std::path::Path;

/// A model that can be trained by gradient descent.
pub trait TrainableModel {
    type Params: ParamOps;
    type Output: InferenceModel;

    /// Predictions for a batch of rows.
    fn forward(&self, input: &Array2<f64>) -> Array1<f64>;
    /// Parameter gradients given the gradient of the loss w.r.t. predictions.
    fn backward(&self, input: &Array2<f64>, grad_output: &Array1<f64>) -> Self::Params;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: Self::Params);
    fn n_features(&self) -> usize;

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic the optimizer needs on a parameter set.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: f64) -> Self;
    /// Largest absolute component, used for convergence checks.
    fn max_abs(&self) -> f64;
}

/// A fitted model consumed read-only for inference.
pub trait InferenceModel: Sized {
    /// Persisted form of the model.
    type ParamsRepr: SerializableParams;

    /// One prediction per input row, in input order.
    ///
    /// # Errors
    /// [`Error::Schema`](crate::Error::Schema) if the matrix width differs
    /// from [`n_features_in`](Self::n_features_in).
    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>>;

    fn n_features_in(&self) -> usize;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>;

    /// Persist the model atomically at `path`.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        artifact::save_params(path.as_ref(), &self.extract_params())
    }

    /// Load a model persisted with [`save_to_file`](Self::save_to_file).
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let params = artifact::load_params(path.as_ref())?;
        Self::from_params(params)
    }
}
