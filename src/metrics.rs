//! Metrics for evaluating regression models.
//!
//! All functions panic if `y_true` and `y_pred` differ in length, and return
//! 0 for empty input.

use ndarray::Array1;

/// Mean Squared Error: `mean((y_true - y_pred)^2)`.
pub fn mse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Arrays must have the same length");
    if y_true.is_empty() {
        return 0.0;
    }
    let diff = y_true - y_pred;
    diff.dot(&diff) / y_true.len() as f64
}

/// Root Mean Squared Error, in the same units as the target.
pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// Mean Absolute Error: `mean(|y_true - y_pred|)`.
pub fn mae(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Arrays must have the same length");
    if y_true.is_empty() {
        return 0.0;
    }
    (y_true - y_pred).mapv(f64::abs).sum() / y_true.len() as f64
}

/// Coefficient of determination: `1 - SS_res / SS_tot`.
///
/// 1 is a perfect fit. A constant target gives 1 for a perfect prediction and
/// 0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "Arrays must have the same length");
    if y_true.is_empty() {
        return 0.0;
    }

    let mean = y_true.sum() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_and_rmse() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.0, 2.0, 5.0];
        assert!((mse(&y_true, &y_pred) - 4.0 / 3.0).abs() < 1e-12);
        assert!((rmse(&y_true, &y_pred) - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mae() {
        let y_true = array![1.0, -2.0];
        let y_pred = array![2.0, 0.0];
        assert!((mae(&y_true, &y_pred) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_r2_score() {
        let y_true = array![1.0, 2.0, 3.0];
        assert_eq!(r2_score(&y_true, &y_true), 1.0);
        // Predicting the mean scores 0
        assert!(r2_score(&y_true, &array![2.0, 2.0, 2.0]).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let y_true = array![4.0, 4.0];
        assert_eq!(r2_score(&y_true, &array![4.0, 4.0]), 1.0);
        assert_eq!(r2_score(&y_true, &array![3.0, 4.0]), 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        mse(&array![1.0], &array![1.0, 2.0]);
    }
}
