//! Serialization of fitted parameters.
//!
//! Fitted transformers and models expose a plain-data parameter struct
//! (`Vec<f64>`, `String`, scalars) that is converted to and from bytes through
//! [`SerializableParams`]. Anything that derives serde's `Serialize` and
//! `Deserialize` gets the bincode encoding for free.

use std::error::Error;

/// A parameter representation that can be serialized to and from bytes.
///
/// Implementors should contain only plain data, never live ndarray views or
/// file handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        weights: Vec<f64>,
        label: String,
    }

    #[test]
    fn test_blanket_impl_round_trip() {
        let sample = Sample {
            weights: vec![1.5, -2.0],
            label: "scaler".to_string(),
        };
        let bytes = sample.to_bytes().unwrap();
        let restored = Sample::from_bytes(&bytes).unwrap();
        assert_eq!(sample, restored);
    }

    #[test]
    fn test_truncated_bytes_fail() {
        let bytes = Sample {
            weights: vec![1.0; 4],
            label: "x".to_string(),
        }
        .to_bytes()
        .unwrap();
        assert!(Sample::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
