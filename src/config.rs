//! Application configuration.
//!
//! One [`AppConfig`] is built at startup (defaults, or a TOML file) and handed
//! to every component, so the transformation step, the trainer and the
//! prediction service agree on artifact paths and column lists.
//!
//! ```toml
//! [artifacts]
//! artifact_dir = "artifacts"
//!
//! [transformation]
//! numerical_columns = ["reading score", "writing score"]
//! target_column = "math score"
//!
//! [training]
//! learning_rate = 0.01
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactConfig,
    pub transformation: TransformationConfig,
    pub training: TrainingConfig,
}

/// Where persisted artifacts live.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub artifact_dir: PathBuf,
    pub preprocessor_file: String,
    pub model_file: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            preprocessor_file: "preprocessor.bin".to_string(),
            model_file: "model.bin".to_string(),
        }
    }
}

impl ArtifactConfig {
    /// Artifacts under `dir` with the default file names.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.preprocessor_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }
}

/// Column lists of the preprocessing plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformationConfig {
    pub numerical_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub target_column: String,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            numerical_columns: vec!["reading score".to_string(), "writing score".to_string()],
            categorical_columns: [
                "gender",
                "race/ethnicity",
                "parental level of education",
                "lunch",
                "test preparation course",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            target_column: "math score".to_string(),
        }
    }
}

impl TransformationConfig {
    /// Columns read as numbers from CSV: the numerical features and the target.
    pub fn numeric_csv_columns(&self) -> Vec<&str> {
        self.numerical_columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.target_column.as_str()))
            .collect()
    }

    /// Check the column lists.
    ///
    /// # Errors
    /// [`Error::Config`] for an empty list, a name repeated within or across
    /// lists, or the target listed as a feature.
    pub fn validate(&self) -> Result<()> {
        if self.numerical_columns.is_empty() {
            return Err(Error::Config("numerical_columns is empty".to_string()));
        }
        if self.categorical_columns.is_empty() {
            return Err(Error::Config("categorical_columns is empty".to_string()));
        }
        if self.target_column.is_empty() {
            return Err(Error::Config("target_column is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for name in self.numerical_columns.iter().chain(&self.categorical_columns) {
            if name == &self.target_column {
                return Err(Error::Config(format!(
                    "target column '{name}' is listed as a feature"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("column '{name}' is listed twice")));
            }
        }
        Ok(())
    }
}

/// Hyperparameters of the regression trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub tolerance: f64,
    /// Mini-batch size; absent means full batch.
    pub batch_size: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_epochs: 5000,
            tolerance: 1e-9,
            batch_size: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_epochs == 0 {
            return Err(Error::Config("max_epochs must be at least 1".to_string()));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if self.batch_size == Some(0) {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load and validate a TOML configuration file. Missing keys take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid TOML configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.artifacts.preprocessor_file.is_empty() || self.artifacts.model_file.is_empty() {
            return Err(Error::Config("artifact file names must not be empty".to_string()));
        }
        if self.artifacts.preprocessor_file == self.artifacts.model_file {
            return Err(Error::Config(
                "preprocessor and model artifacts must use different files".to_string(),
            ));
        }
        self.transformation.validate()?;
        self.training.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(
            config.artifacts.preprocessor_path(),
            PathBuf::from("artifacts/preprocessor.bin")
        );
        assert_eq!(config.artifacts.model_path(), PathBuf::from("artifacts/model.bin"));
        assert_eq!(config.transformation.categorical_columns.len(), 5);
        assert_eq!(
            config.transformation.numeric_csv_columns(),
            vec!["reading score", "writing score", "math score"]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [artifacts]
            artifact_dir = "/tmp/models"

            [training]
            learning_rate = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.artifacts.artifact_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.artifacts.model_file, "model.bin");
        assert_eq!(config.training.learning_rate, 0.05);
        assert_eq!(config.training.max_epochs, 5000);
    }

    #[test]
    fn test_rejects_duplicate_column() {
        let mut t = TransformationConfig::default();
        t.categorical_columns.push("reading score".to_string());
        assert!(matches!(t.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_target_as_feature() {
        let mut t = TransformationConfig::default();
        t.numerical_columns.push("math score".to_string());
        assert!(matches!(t.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_lists() {
        let mut t = TransformationConfig::default();
        t.numerical_columns.clear();
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_training_values() {
        let bad = AppConfig::from_toml_str("[training]\nlearning_rate = -1.0\n");
        assert!(matches!(bad, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("artifacts = 3"),
            Err(Error::Config(_))
        ));
    }
}
