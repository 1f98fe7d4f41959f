//! Categorical feature encoding transformers.
//!
//! ## OneHotEncoder
//! Converts string categories to one-hot (dummy) encoding.
//!
//! ```ignore
//! // Input: [["female"], ["male"]]   (2 samples, 1 categorical feature)
//! // Output: [[1, 0], [0, 1]]        (2 samples, 2 binary features)
//! ```
//!
//! Categories are stored as the original strings, so a fitted encoder can be
//! applied to raw records at inference time without a separate label mapping.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (output zeros for that feature).
    Ignore,
}
