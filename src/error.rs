//! Application-level error type.
//!
//! Components never recover locally: every failure is wrapped with its cause
//! and location and handed back to the caller.

use crate::preprocessing::PreprocessingError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Bad column lists, bad paths, invalid hyperparameters.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Cannot parse '{value}' as a number in column '{column}', row {row}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// The record does not match what the plan or model expects.
    #[error("Schema mismatch: {0}")]
    Schema(#[source] PreprocessingError),

    #[error("Preprocessing error: {0}")]
    Preprocessing(#[source] PreprocessingError),

    /// A persisted plan or model is missing or cannot be decoded.
    #[error("Artifact unavailable at {}: {reason}", path.display())]
    ArtifactUnavailable { path: PathBuf, reason: String },

    #[error("Model error: {0}")]
    Model(String),
}

impl Error {
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}

impl From<PreprocessingError> for Error {
    fn from(err: PreprocessingError) -> Self {
        if err.is_schema_mismatch() {
            Error::Schema(err)
        } else {
            Error::Preprocessing(err)
        }
    }
}
