//! # student-performance
//!
//! Predicts a student's math score from demographic attributes and their
//! reading and writing scores.
//!
//! The crate has two halves that meet only through persisted artifacts:
//!
//! - **Training**: [`components::DataTransformation`] builds the column-wise
//!   preprocessing plan, fits it on the training split, applies it to both
//!   splits and persists it; [`components::ModelTrainer`] fits a linear
//!   regressor on the result and persists the model.
//! - **Inference**: [`pipeline::PredictPipeline`] reloads both artifacts and
//!   scores raw records, typically built from [`pipeline::CustomData`].
//!
//! Preprocessing transformers follow a two-state pattern:
//! [`preprocessing::Transformer`] (unfitted) and
//! [`preprocessing::FittedTransformer`] (fitted, transform-only). Models do
//! the same with [`model::Unfitted`] and [`model::Fitted`] markers.
//!
//! ## Example
//!
//! ```no_run
//! use student_performance::config::AppConfig;
//! use student_performance::components::{DataTransformation, ModelTrainer};
//! use student_performance::pipeline::{CustomData, PredictPipeline};
//! use std::path::Path;
//!
//! # fn main() -> student_performance::Result<()> {
//! let config = AppConfig::default();
//! let (train, test, _) = DataTransformation::new(&config)?
//!     .fit_and_apply_paths(Path::new("data/train.csv"), Path::new("data/test.csv"))?;
//! ModelTrainer::new(&config)?.initiate_model_trainer(&train, &test)?;
//!
//! let record = CustomData::new("female", "group B", "bachelor's degree", "standard", "none", 72.0, 74.0);
//! let pipeline: PredictPipeline = PredictPipeline::new(config.artifacts.clone());
//! let prediction = pipeline.predict(&record.to_table()?)?;
//! assert_eq!(prediction.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod components;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod pipeline;
pub mod preprocessing;
pub mod serialization;
pub mod trainer;

pub use error::{Error, Result};
