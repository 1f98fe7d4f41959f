//! Trains the regressor on transformed matrices and persists it.

use crate::config::{AppConfig, ArtifactConfig, TrainingConfig};
use crate::dataset::{Dataset, InMemoryDataset};
use crate::error::{Error, Result};
use crate::loss::MSELoss;
use crate::metrics;
use crate::model::{FittedLinearRegression, InferenceModel, LinearRegression};
use crate::optimizer::SGD;
use crate::trainer::Trainer;
use ndarray::Array2;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a training run.
#[derive(Clone, Debug)]
pub struct TrainingReport {
    pub model_path: PathBuf,
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_rmse: f64,
}

#[derive(Clone, Debug)]
pub struct ModelTrainer {
    training: TrainingConfig,
    artifacts: ArtifactConfig,
}

impl ModelTrainer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.training.validate()?;
        Ok(Self {
            training: config.training.clone(),
            artifacts: config.artifacts.clone(),
        })
    }

    /// Fit a linear regression on `train_arr`, score it on `test_arr`, persist it.
    ///
    /// Both matrices have the target as their last column, as returned by
    /// [`DataTransformation::fit_and_apply`](crate::components::DataTransformation::fit_and_apply).
    pub fn initiate_model_trainer(
        &self,
        train_arr: &Array2<f64>,
        test_arr: &Array2<f64>,
    ) -> Result<TrainingReport> {
        let train = InMemoryDataset::from_matrix_with_target(train_arr.view()).map_err(Error::Model)?;
        let test = InMemoryDataset::from_matrix_with_target(test_arr.view()).map_err(Error::Model)?;
        if train.n_features() != test.n_features() {
            return Err(Error::Model(format!(
                "train has {} features, test has {}",
                train.n_features(),
                test.n_features()
            )));
        }

        let mut builder = Trainer::builder(MSELoss, SGD::new(self.training.learning_rate))
            .max_epochs(self.training.max_epochs)
            .tolerance(self.training.tolerance);
        if let Some(size) = self.training.batch_size {
            builder = builder.batch_size(size);
        }
        let trainer = builder.build();

        info!(
            rows = train.features().nrows(),
            features = train.n_features(),
            "training linear regression"
        );
        let model: FittedLinearRegression =
            trainer.fit(LinearRegression::new(train.n_features()), &train)?;

        let train_r2 = metrics::r2_score(train.targets(), &model.predict_batch(train.features())?);
        let test_pred = model.predict_batch(test.features())?;
        let test_r2 = metrics::r2_score(test.targets(), &test_pred);
        let test_rmse = metrics::rmse(test.targets(), &test_pred);
        info!(train_r2, test_r2, test_rmse, "model evaluated");

        let model_path = self.artifacts.model_path();
        model.save_to_file(&model_path)?;
        info!(path = %model_path.display(), "saved model");

        Ok(TrainingReport {
            model_path,
            train_r2,
            test_r2,
            test_rmse,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize) -> Array2<f64> {
        // target = 3*x0 + 0.5*x1 + 10
        Array2::from_shape_fn((rows, 3), |(i, j)| {
            let x0 = (i % 5) as f64;
            let x1 = ((i * 3) % 4) as f64;
            match j {
                0 => x0,
                1 => x1,
                _ => 3.0 * x0 + 0.5 * x1 + 10.0,
            }
        })
    }

    fn config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            artifacts: ArtifactConfig::in_dir(dir),
            training: TrainingConfig {
                learning_rate: 0.05,
                max_epochs: 20_000,
                tolerance: 1e-12,
                batch_size: None,
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_trains_scores_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(&config(dir.path())).unwrap();
        let report = trainer
            .initiate_model_trainer(&matrix(40), &matrix(10))
            .unwrap();

        assert!(report.test_r2 > 0.99, "r2 = {}", report.test_r2);
        assert!(report.model_path.exists());

        let loaded = FittedLinearRegression::load_from_file(&report.model_path).unwrap();
        assert_eq!(loaded.n_features_in(), 2);
    }

    #[test]
    fn test_width_mismatch_between_splits() {
        let dir = tempfile::tempdir().unwrap();
        let trainer = ModelTrainer::new(&config(dir.path())).unwrap();
        let narrow = Array2::<f64>::ones((4, 2));
        assert!(matches!(
            trainer.initiate_model_trainer(&matrix(10), &narrow),
            Err(Error::Model(_))
        ));
    }
}
