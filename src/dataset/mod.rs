//! Dataset abstractions.
//!
//! - [`Table`]: raw named-column records, read from CSV.
//! - [`Dataset`]: a source of `(X, y)` pairs for model training, where `X` is
//!   a feature matrix of shape `(n_samples, n_features)` and `y` a target
//!   vector of shape `(n_samples,)`.
//!
//! # Example
//!
//! ```rust
//! use student_performance::dataset::{Dataset, InMemoryDataset};
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0]];
//! let y = array![0.0, 1.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! for batch in dataset.batches(1) {
//!     let (x_batch, y_batch) = batch.unwrap();
//!     assert_eq!(x_batch.nrows(), y_batch.len());
//! }
//! ```

use ndarray::{Array1, Array2};
use std::{fmt::Debug, ops::Range};

pub mod memory;
pub mod table;

pub use self::memory::InMemoryDataset;
pub use self::table::{Column, Table};

/// Abstract interface for a training dataset.
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Returns the total number of samples in the dataset, if known.
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Number of feature columns.
    fn n_features(&self) -> usize;

    /// Creates an iterator over fixed-size batches (the last may be smaller).
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size: batch_size.max(1),
            current: 0,
        }
    }

    /// Loads the samples in `range` as `(X, y)`.
    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error>;
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    current: usize,
}

impl<D: Dataset> Iterator for DatasetBatchIter<'_, D> {
    type Item = Result<(Array2<f64>, Array1<f64>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len()?;
        if self.current >= total {
            return None;
        }

        let end = self.current.saturating_add(self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
