//! Gradient-descent training loop.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::Optimizer;
use tracing::{debug, info};

// --- Main struct (immutable after build) ---
#[derive(Clone, Debug)]
pub struct Trainer<L, O> {
    pub(crate) batch_size: Option<usize>,
    pub(crate) max_epochs: usize,
    pub(crate) tolerance: f64,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
}

// --- Builder ---
#[derive(Clone, Debug)]
pub struct TrainerBuilder<L, O> {
    batch_size: Option<usize>,
    max_epochs: usize,
    tolerance: f64,
    loss_fn: L,
    optimizer: O,
}

impl<L: Loss, O> TrainerBuilder<L, O> {
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: None,
            max_epochs: 1000,
            tolerance: 0.0,
            loss_fn,
            optimizer,
        }
    }

    /// Mini-batch size. Unset means full-batch gradient descent.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Stop once the epoch loss changes by less than `tolerance`.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn build(self) -> Trainer<L, O> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            tolerance: self.tolerance,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
        }
    }
}

impl<L: Loss, O> Trainer<L, O> {
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<L, O> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    /// Train `model` on `dataset` and return the fitted model.
    ///
    /// # Errors
    /// [`Error::Model`] if the dataset is empty or of unknown length, if its
    /// width differs from the model's, if a batch cannot be loaded, or if the
    /// loss stops being finite.
    pub fn fit<M, D>(&self, mut model: M, dataset: &D) -> Result<M::Output>
    where
        M: TrainableModel,
        O: Optimizer<M::Params>,
        D: Dataset,
    {
        let n_total = dataset
            .len()
            .ok_or_else(|| Error::Model("dataset length unknown".to_string()))?;
        if n_total == 0 {
            return Err(Error::Model("dataset is empty".to_string()));
        }
        if dataset.n_features() != model.n_features() {
            return Err(Error::Model(format!(
                "model expects {} features, dataset has {}",
                model.n_features(),
                dataset.n_features()
            )));
        }

        let batch_size = self.batch_size.unwrap_or(n_total);
        let mut prev_loss = f64::INFINITY;

        for epoch in 0..self.max_epochs {
            let mut total_loss = 0.0;
            for batch_result in dataset.batches(batch_size) {
                let (batch_x, batch_y) =
                    batch_result.map_err(|e| Error::Model(format!("data error: {e:?}")))?;
                let preds = model.forward(&batch_x);
                total_loss += self.loss_fn.loss(&preds, &batch_y) * batch_y.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(new_params);
            }

            let avg_loss = total_loss / n_total as f64;
            if !avg_loss.is_finite() || !model.params().max_abs().is_finite() {
                return Err(Error::Model(format!(
                    "training diverged at epoch {epoch}; lower the learning rate"
                )));
            }
            debug!(epoch, loss = avg_loss, "epoch finished");

            if (prev_loss - avg_loss).abs() < self.tolerance {
                info!(epoch, loss = avg_loss, "training converged");
                return Ok(model.into_fitted());
            }
            prev_loss = avg_loss;
        }

        info!(epochs = self.max_epochs, loss = prev_loss, "training stopped at max_epochs");
        Ok(model.into_fitted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;
    use crate::loss::MSELoss;
    use crate::model::{InferenceModel, LinearRegression};
    use crate::optimizer::SGD;
    use ndarray::{array, Array1, Array2};

    fn linear_data() -> InMemoryDataset {
        // y = 2*x0 - x1 + 3
        let x = Array2::from_shape_fn((20, 2), |(i, j)| ((i * (j + 1)) % 7) as f64 / 3.0);
        let y: Array1<f64> = x.rows().into_iter().map(|r| 2.0 * r[0] - r[1] + 3.0).collect();
        InMemoryDataset::new(x, y).unwrap()
    }

    #[test]
    fn test_full_batch_recovers_coefficients() {
        let trainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .max_epochs(20_000)
            .tolerance(1e-14)
            .build();
        let fitted = trainer.fit(LinearRegression::new(2), &linear_data()).unwrap();

        assert!((fitted.weights()[0] - 2.0).abs() < 1e-3);
        assert!((fitted.weights()[1] + 1.0).abs() < 1e-3);
        assert!((fitted.bias() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_mini_batch_training_reduces_error() {
        let data = linear_data();
        let trainer = Trainer::builder(MSELoss, SGD::new(0.05))
            .batch_size(4)
            .max_epochs(2_000)
            .build();
        let fitted = trainer.fit(LinearRegression::new(2), &data).unwrap();
        let preds = fitted.predict_batch(data.features()).unwrap();
        assert!(crate::metrics::mse(data.targets(), &preds) < 1e-2);
    }

    #[test]
    fn test_width_mismatch() {
        let trainer = Trainer::builder(MSELoss, SGD::new(0.1)).build();
        let result = trainer.fit(LinearRegression::new(3), &linear_data());
        assert!(matches!(result, Err(Error::Model(_))));
    }

    #[test]
    fn test_divergence_is_reported() {
        let data = InMemoryDataset::new(array![[100.0], [200.0]], array![1.0, 2.0]).unwrap();
        let trainer = Trainer::builder(MSELoss, SGD::new(10.0))
            .max_epochs(1_000)
            .build();
        assert!(matches!(
            trainer.fit(LinearRegression::new(1), &data),
            Err(Error::Model(_))
        ));
    }
}
