use crate::dataset::Dataset;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use std::ops::Range;

/// Features and targets held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self, String> {
        if x.nrows() != y.len() {
            return Err("x and y must have same length".into());
        }
        if x.nrows() == 0 {
            return Err("Dataset is empty".into());
        }
        Ok(Self { x, y })
    }

    /// Split a transformed matrix whose last column is the target.
    pub fn from_matrix_with_target(matrix: ArrayView2<'_, f64>) -> Result<Self, String> {
        let cols = matrix.ncols();
        if cols < 2 {
            return Err(format!(
                "expected at least one feature column plus the target, got {cols} columns"
            ));
        }
        let x = matrix.slice(s![.., ..cols - 1]).to_owned();
        let y = matrix.index_axis(Axis(1), cols - 1).to_owned();
        Self::new(x, y)
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.y
    }
}

impl Dataset for InMemoryDataset {
    type Error = std::convert::Infallible;

    fn len(&self) -> Option<usize> {
        Some(self.x.nrows())
    }

    fn n_features(&self) -> usize {
        self.x.ncols()
    }

    fn get_batch(&self, range: Range<usize>) -> Result<(Array2<f64>, Array1<f64>), Self::Error> {
        let x = self.x.slice(s![range.clone(), ..]).to_owned();
        let y = self.y.slice(s![range]).to_owned();
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_matrix_with_target() {
        let m = array![[1.0, 2.0, 10.0], [3.0, 4.0, 20.0]];
        let ds = InMemoryDataset::from_matrix_with_target(m.view()).unwrap();
        assert_eq!(ds.features(), &array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(ds.targets(), &array![10.0, 20.0]);
        assert_eq!(ds.n_features(), 2);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert!(InMemoryDataset::new(array![[1.0], [2.0]], array![1.0]).is_err());
    }

    #[test]
    fn test_rejects_target_only_matrix() {
        let m = array![[1.0], [2.0]];
        assert!(InMemoryDataset::from_matrix_with_target(m.view()).is_err());
    }
}
