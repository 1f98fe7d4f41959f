//! Feature scaling transformers.
//!
//! | Scaler | Formula | Use Case |
//! |--------|---------|----------|
//! | [`StandardScaler`] | `(x - mean) / std` | Gaussian-like features |
//! | [`StandardScaler`] with `with_mean(false)` | `x / std` | Sparse or non-negative features (one-hot output) |

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
