//! Data preprocessing transformers.
//!
//! Transformers follow a two-state pattern: an unfitted [`Transformer`]
//! holds hyperparameters, and `fit` returns a [`FittedTransformer`] holding
//! the learned statistics. Only the fitted form can `transform`, so a test
//! split can never be fitted by accident through the inference path.
//!
//! # Available Transformers
//!
//! ## Imputation
//! - [`SimpleImputer`]: Fill missing numbers with mean, median, most_frequent, or constant
//! - [`CategoricalImputer`]: Fill missing labels with the most frequent label or a constant
//!
//! ## Encoding
//! - [`OneHotEncoder`]: One indicator column per category, sorted lexicographically
//!
//! ## Scaling
//! - [`StandardScaler`]: Z-score normalization, optionally without centering
//!
//! ## Composition
//! - [`Pipeline`]: Chain named steps over one block of columns
//! - [`ColumnTransformer`]: Route named column subsets to pipelines and concatenate
//!
//! # Example
//!
//! ```ignore
//! use student_performance::preprocessing::{FittedTransformer, Transformer};
//!
//! let fitted = column_transformer.fit(&train)?;
//! let train_features = fitted.transform(&train)?;
//! fitted.save_to_file("artifacts/preprocessor.bin")?;
//!
//! let loaded = FittedColumnTransformer::load_from_file("artifacts/preprocessor.bin")?;
//! let test_features = loaded.transform(&test)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod imputation;
pub mod pipeline;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnKind, ColumnTransformer, ColumnTransformerParams, FittedColumnTransformer,
};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use error::PreprocessingError;
pub use imputation::{
    CategoricalImputer, CategoricalImputerParams, CategoricalStrategy, FittedCategoricalImputer,
    FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams,
};
pub use pipeline::{Block, BlockData, FittedPipeline, Pipeline, PipelineParams, PipelineStepEnum};
pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
