//! Imputation transformers for handling missing values.
//!
//! | Transformer | Input | Description |
//! |-------------|-------|-------------|
//! | [`SimpleImputer`] | numeric, NaN = missing | mean, median, most_frequent, or constant |
//! | [`CategoricalImputer`] | categorical, `None` = missing | most_frequent or constant |

pub mod categorical;
pub mod simple;

pub use categorical::{
    CategoricalImputer, CategoricalImputerParams, CategoricalStrategy, FittedCategoricalImputer,
};
pub use simple::{FittedSimpleImputer, ImputeStrategy, SimpleImputer, SimpleImputerParams};
