//! Apply different pipelines to different named column subsets.

#[allow(clippy::module_inception)]
pub mod column_transformer;

pub use column_transformer::{
    BranchParams, ColumnKind, ColumnTransformer, ColumnTransformerParams,
    FittedColumnTransformer,
};
