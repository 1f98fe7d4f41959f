//! Inference: reload the persisted plan and model, score raw records.

use crate::artifact;
use crate::config::ArtifactConfig;
use crate::dataset::{Column, Table};
use crate::error::{Error, Result};
use crate::model::{FittedLinearRegression, InferenceModel};
use crate::preprocessing::{
    ColumnTransformerParams, FittedColumnTransformer, FittedTransformer, PreprocessingError,
};
use ndarray::Array1;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

/// Scores raw records with the artifacts found under an [`ArtifactConfig`].
///
/// Artifacts are read on every [`predict`](Self::predict) call, so a newly
/// persisted plan or model is picked up without restarting. Use
/// [`load`](Self::load) to read them once and score many batches.
#[derive(Clone, Debug)]
pub struct PredictPipeline<M = FittedLinearRegression> {
    artifacts: ArtifactConfig,
    _model: PhantomData<M>,
}

impl<M: InferenceModel> PredictPipeline<M> {
    pub fn new(artifacts: ArtifactConfig) -> Self {
        Self {
            artifacts,
            _model: PhantomData,
        }
    }

    /// Read the plan and the model from their configured paths.
    ///
    /// # Errors
    /// [`Error::ArtifactUnavailable`] if either artifact is missing or
    /// cannot be decoded. [`Error::Schema`] if the model does not accept the
    /// plan's output width.
    pub fn load(&self) -> Result<Predictor<M>> {
        let plan_path = self.artifacts.preprocessor_path();
        let model_path = self.artifacts.model_path();
        info!(
            preprocessor = %plan_path.display(),
            model = %model_path.display(),
            "loading artifacts"
        );

        let plan = load_plan(&plan_path)?;
        let model = M::load_from_file(&model_path).map_err(|e| match e {
            Error::ArtifactUnavailable { .. } => e,
            other => Error::ArtifactUnavailable {
                path: model_path.clone(),
                reason: other.to_string(),
            },
        })?;

        Predictor::new(plan, model)
    }

    /// One prediction per row of `features`, in row order.
    ///
    /// # Errors
    /// See [`load`](Self::load) and [`Predictor::predict`].
    pub fn predict(&self, features: &Table) -> Result<Array1<f64>> {
        self.load()?.predict(features)
    }
}

fn load_plan(path: &Path) -> Result<FittedColumnTransformer> {
    let params: ColumnTransformerParams = artifact::load_params(path)?;
    FittedColumnTransformer::from_params(params).map_err(|e| Error::ArtifactUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// A loaded plan and model, ready to score.
#[derive(Clone, Debug)]
pub struct Predictor<M> {
    plan: FittedColumnTransformer,
    model: M,
}

impl<M: InferenceModel> Predictor<M> {
    /// # Errors
    /// [`Error::Schema`] if the model's input width differs from the plan's
    /// output width.
    pub fn new(plan: FittedColumnTransformer, model: M) -> Result<Self> {
        if plan.n_features_out() != model.n_features_in() {
            return Err(Error::Schema(PreprocessingError::FeatureMismatch {
                expected_features: model.n_features_in(),
                got_features: plan.n_features_out(),
            }));
        }
        Ok(Self { plan, model })
    }

    pub fn plan(&self) -> &FittedColumnTransformer {
        &self.plan
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Apply the plan transform-only, then run batch inference.
    ///
    /// # Errors
    /// [`Error::Schema`] if a column is missing, has the wrong kind, or holds
    /// a category the plan never saw.
    pub fn predict(&self, features: &Table) -> Result<Array1<f64>> {
        let scaled = self.plan.transform(features)?;
        debug!(rows = scaled.nrows(), cols = scaled.ncols(), "records transformed");
        self.model.predict_batch(&scaled)
    }
}

/// Column name used by the plan for each [`CustomData`] field, in field order.
pub const FIELD_COLUMNS: [(&str, &str); 7] = [
    ("gender", "gender"),
    ("race_ethnicity", "race/ethnicity"),
    ("parental_level_of_education", "parental level of education"),
    ("lunch", "lunch"),
    ("test_preparation_course", "test preparation course"),
    ("reading_score", "reading score"),
    ("writing_score", "writing score"),
];

/// One student record as entered for prediction.
///
/// `None` marks a missing value; the plan imputes it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomData {
    pub gender: Option<String>,
    pub race_ethnicity: Option<String>,
    pub parental_level_of_education: Option<String>,
    pub lunch: Option<String>,
    pub test_preparation_course: Option<String>,
    pub reading_score: Option<f64>,
    pub writing_score: Option<f64>,
}

impl CustomData {
    /// A record with every field present.
    pub fn new(
        gender: impl Into<String>,
        race_ethnicity: impl Into<String>,
        parental_level_of_education: impl Into<String>,
        lunch: impl Into<String>,
        test_preparation_course: impl Into<String>,
        reading_score: f64,
        writing_score: f64,
    ) -> Self {
        Self {
            gender: Some(gender.into()),
            race_ethnicity: Some(race_ethnicity.into()),
            parental_level_of_education: Some(parental_level_of_education.into()),
            lunch: Some(lunch.into()),
            test_preparation_course: Some(test_preparation_course.into()),
            reading_score: Some(reading_score),
            writing_score: Some(writing_score),
        }
    }

    /// A single-row table keyed by the plan's column names.
    pub fn to_table(&self) -> Result<Table> {
        Self::tables_from_records(std::slice::from_ref(self))
    }

    /// A table with one row per record, in record order.
    pub fn tables_from_records(records: &[CustomData]) -> Result<Table> {
        let categorical = |get: fn(&CustomData) -> Option<String>| {
            Column::Categorical(records.iter().map(get).collect())
        };
        let numeric = |get: fn(&CustomData) -> Option<f64>| {
            Column::Numeric(records.iter().map(get).collect())
        };

        let columns = [
            categorical(|r| r.gender.clone()),
            categorical(|r| r.race_ethnicity.clone()),
            categorical(|r| r.parental_level_of_education.clone()),
            categorical(|r| r.lunch.clone()),
            categorical(|r| r.test_preparation_course.clone()),
            numeric(|r| r.reading_score),
            numeric(|r| r.writing_score),
        ];

        let mut table = Table::new();
        for ((_, name), column) in FIELD_COLUMNS.iter().zip(columns) {
            table.push_column(*name, column)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearModel, LinearParams};
    use crate::preprocessing::{ColumnTransformer, ImputeStrategy, Pipeline, SimpleImputer, Transformer};
    use ndarray::array;

    fn student() -> CustomData {
        CustomData::new(
            "female",
            "group B",
            "bachelor's degree",
            "standard",
            "none",
            72.0,
            74.0,
        )
    }

    #[test]
    fn test_record_uses_plan_column_names() {
        let table = student().to_table().unwrap();
        assert_eq!(table.n_rows(), 1);
        assert_eq!(
            table.column_names(),
            &[
                "gender",
                "race/ethnicity",
                "parental level of education",
                "lunch",
                "test preparation course",
                "reading score",
                "writing score",
            ]
        );
        assert_eq!(table.column("reading score"), Some(&Column::numeric(&[72.0])));
        assert_eq!(table.column("race/ethnicity"), Some(&Column::categorical(&["group B"])));
    }

    #[test]
    fn test_missing_field_stays_missing() {
        let record = CustomData {
            writing_score: None,
            ..student()
        };
        let table = record.to_table().unwrap();
        assert_eq!(table.column("writing score"), Some(&Column::Numeric(vec![None])));
    }

    #[test]
    fn test_tables_from_records_keeps_order() {
        let second = CustomData {
            gender: Some("male".to_string()),
            ..student()
        };
        let table = CustomData::tables_from_records(&[student(), second]).unwrap();
        assert_eq!(table.column("gender"), Some(&Column::categorical(&["female", "male"])));
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline: PredictPipeline = PredictPipeline::new(ArtifactConfig::in_dir(dir.path()));
        let err = pipeline
            .predict(&student().to_table().unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::ArtifactUnavailable { .. }));
    }

    fn reading_only_plan() -> FittedColumnTransformer {
        let table = Table::new()
            .with_column("reading score", Column::numeric(&[60.0, 80.0]))
            .unwrap();
        ColumnTransformer::new()
            .add(
                "numerical_pipeline",
                Pipeline::new()
                    .add_simple_imputer("imputer", SimpleImputer::new(ImputeStrategy::Median)),
                ["reading score"],
            )
            .fit(&table)
            .unwrap()
    }

    #[test]
    fn test_width_mismatch_between_plan_and_model() {
        let model = LinearModel::from_linear_params(LinearParams {
            weights: array![1.0, 1.0],
            bias: 0.0,
        });
        let err = Predictor::new(reading_only_plan(), model).unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_predictor_imputes_and_scores() {
        let model = LinearModel::from_linear_params(LinearParams {
            weights: array![0.5],
            bias: 1.0,
        });
        let predictor = Predictor::new(reading_only_plan(), model).unwrap();
        assert_eq!(predictor.plan().n_features_out(), 1);
        assert_eq!(predictor.model().n_features_in(), 1);
        assert_eq!(predictor.model().bias(), 1.0);
        let table = Table::new()
            .with_column("reading score", Column::Numeric(vec![Some(10.0), None]))
            .unwrap();
        // Missing value takes the training median, 70
        assert_eq!(predictor.predict(&table).unwrap(), array![6.0, 36.0]);
    }

    #[test]
    fn test_predictor_rejects_zero_rows_missing_a_column() {
        let model = LinearModel::from_linear_params(LinearParams {
            weights: array![0.5],
            bias: 1.0,
        });
        let predictor = Predictor::new(reading_only_plan(), model).unwrap();
        let empty = Table::new()
            .with_column("writing score", Column::Numeric(Vec::new()))
            .unwrap();
        assert!(predictor.predict(&empty).unwrap_err().is_schema_mismatch());

        let empty = Table::new()
            .with_column("reading score", Column::Numeric(Vec::new()))
            .unwrap();
        assert_eq!(predictor.predict(&empty).unwrap().len(), 0);
    }
}
