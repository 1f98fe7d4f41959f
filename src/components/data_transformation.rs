//! Builds, fits and persists the column-wise preprocessing plan.

use crate::config::{AppConfig, ArtifactConfig, TransformationConfig};
use crate::dataset::Table;
use crate::error::{Error, Result};
use crate::preprocessing::{
    CategoricalImputer, ColumnTransformer, FittedColumnTransformer, FittedTransformer,
    ImputeStrategy, OneHotEncoder, Pipeline, PreprocessingError, SimpleImputer, StandardScaler,
    Transformer,
};
use ndarray::{concatenate, Array1, Array2, Axis};
use std::path::{Path, PathBuf};
use tracing::info;

pub const NUMERICAL_BRANCH: &str = "numerical_pipeline";
pub const CATEGORICAL_BRANCH: &str = "categorical_pipeline";

/// The transformation step: raw train/test tables in, numeric matrices out.
#[derive(Clone, Debug)]
pub struct DataTransformation {
    columns: TransformationConfig,
    artifacts: ArtifactConfig,
}

impl DataTransformation {
    /// # Errors
    /// [`Error::Config`] if the column lists are invalid.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.transformation.validate()?;
        Ok(Self {
            columns: config.transformation.clone(),
            artifacts: config.artifacts.clone(),
        })
    }

    /// Where the fitted plan is persisted.
    pub fn preprocessor_path(&self) -> PathBuf {
        self.artifacts.preprocessor_path()
    }

    /// The unfitted plan.
    ///
    /// Numerical columns: median imputation, then scaling without centering.
    /// Categorical columns: most-frequent imputation, one-hot encoding, then
    /// scaling without centering.
    pub fn build_plan(&self) -> Result<ColumnTransformer> {
        self.columns.validate()?;

        let numerical = Pipeline::new()
            .add_simple_imputer("imputer", SimpleImputer::new(ImputeStrategy::Median))
            .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));
        info!(columns = ?self.columns.numerical_columns, "numerical pipeline built");

        let categorical = Pipeline::new()
            .add_categorical_imputer("imputer", CategoricalImputer::default())
            .add_one_hot_encoder("encoder", OneHotEncoder::new())
            .add_standard_scaler("scaler", StandardScaler::new().with_mean(false));
        info!(columns = ?self.columns.categorical_columns, "categorical pipeline built");

        Ok(ColumnTransformer::new()
            .add(NUMERICAL_BRANCH, numerical, self.columns.numerical_columns.clone())
            .add(CATEGORICAL_BRANCH, categorical, self.columns.categorical_columns.clone()))
    }

    /// Fit the plan on `train`, apply it to both splits, persist it.
    ///
    /// The held-out split is only transformed with the plan fitted on the
    /// training split. Each returned matrix has the untransformed target as
    /// its last column.
    ///
    /// # Errors
    /// - [`Error::Schema`] if a split lacks a configured column or the target,
    ///   or if the held-out split has a category unseen in training.
    /// - [`Error::Preprocessing`] for other fitting failures.
    /// - [`Error::Io`] if the plan cannot be written.
    pub fn fit_and_apply(
        &self,
        train: &Table,
        test: &Table,
    ) -> Result<(Array2<f64>, Array2<f64>, PathBuf)> {
        info!("obtaining preprocessing plan");
        let plan = self.build_plan()?;

        let target = self.columns.target_column.as_str();
        let (train_features, train_target) = train.split_target(target)?;
        let (test_features, test_target) = test.split_target(target)?;

        info!(
            train_rows = train.n_rows(),
            test_rows = test.n_rows(),
            "applying preprocessing plan on training and testing data"
        );
        let fitted = plan.fit(&train_features)?;
        let train_arr = append_target(fitted.transform(&train_features)?, train_target)?;
        let test_arr = append_target(fitted.transform(&test_features)?, test_target)?;

        let path = self.save_plan(&fitted)?;
        Ok((train_arr, test_arr, path))
    }

    /// Read both CSV files with the configured schema, then [`fit_and_apply`](Self::fit_and_apply).
    pub fn fit_and_apply_paths(
        &self,
        train_csv: &Path,
        test_csv: &Path,
    ) -> Result<(Array2<f64>, Array2<f64>, PathBuf)> {
        let numeric = self.columns.numeric_csv_columns();
        let train = Table::from_csv_path(train_csv, &numeric)?;
        let test = Table::from_csv_path(test_csv, &numeric)?;
        info!(
            train = %train_csv.display(),
            test = %test_csv.display(),
            "read train and test data"
        );
        self.fit_and_apply(&train, &test)
    }

    fn save_plan(&self, fitted: &FittedColumnTransformer) -> Result<PathBuf> {
        let path = self.preprocessor_path();
        fitted.save_to_file(&path).map_err(|e| match e {
            PreprocessingError::IoError(source) => Error::Io {
                path: path.clone(),
                source,
            },
            other => Error::Preprocessing(other),
        })?;
        info!(path = %path.display(), features = fitted.n_features_out(), "saved preprocessing plan");
        Ok(path)
    }
}

fn append_target(features: Array2<f64>, target: Vec<f64>) -> Result<Array2<f64>> {
    let target = Array1::from(target).insert_axis(Axis(1));
    concatenate(Axis(1), &[features.view(), target.view()]).map_err(|e| {
        Error::Preprocessing(PreprocessingError::InvalidShape {
            expected: format!("{} target values", features.nrows()),
            got: e.to_string(),
        })
    })
}
