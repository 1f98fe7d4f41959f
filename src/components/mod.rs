//! Training-side components: preprocessing plan construction and model training.

pub mod data_transformation;
pub mod model_trainer;

pub use data_transformation::{DataTransformation, CATEGORICAL_BRANCH, NUMERICAL_BRANCH};
pub use model_trainer::{ModelTrainer, TrainingReport};
