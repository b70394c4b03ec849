//! Core traits for linear algebra operations
//!
//! [`LinearOperator`] abstracts over anything that can perform a
//! matrix-vector product. The solver uses it to verify residuals of the
//! computed solution set without caring how the operator is stored.

use ndarray::Array1;

/// Trait for linear operators (matrices) that can perform matrix-vector products.
pub trait LinearOperator: Send + Sync {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    ///
    /// `x` must have `num_cols()` entries.
    fn apply(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Apply the transpose: y = A^T * x
    ///
    /// `x` must have `num_rows()` entries.
    fn apply_transpose(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }

    /// Largest absolute entry of `A * x - b`.
    fn residual_max(&self, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
        self.apply(x)
            .iter()
            .zip(b.iter())
            .map(|(ax, bi)| (ax - bi).abs())
            .fold(0.0_f64, max_or_nan)
    }
}

/// `f64::max` that returns NaN when either side is NaN
pub(crate) fn max_or_nan(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
