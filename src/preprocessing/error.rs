//! Error types for preprocessing operations.

use thiserror::Error;

/// Error type for preprocessing operations.
#[derive(Debug, Error)]
pub enum PreprocessingError {
    /// Shape mismatch between expected and actual matrix dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },
    /// Data contains missing values where none are allowed.
    #[error("Missing values: {0}")]
    MissingValues(String),
    /// Invalid hyperparameter or plan configuration.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// A column the plan was fitted on is absent from the input table.
    #[error("Missing column: '{0}'")]
    MissingColumn(String),
    /// A column holds a different kind of data than the step expects.
    #[error("Column '{column}' has the wrong kind: expected {expected}, got {got}")]
    ColumnKind {
        column: String,
        expected: &'static str,
        got: &'static str,
    },
    /// A categorical value that was not seen during fit.
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },
}

impl PreprocessingError {
    /// True for errors caused by the input not matching what the fitted
    /// transformer expects, as opposed to bad parameters or I/O.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            PreprocessingError::MissingColumn(_)
                | PreprocessingError::ColumnKind { .. }
                | PreprocessingError::UnknownCategory { .. }
                | PreprocessingError::FeatureMismatch { .. }
        )
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}
