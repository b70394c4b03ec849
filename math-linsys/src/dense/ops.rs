//! Elementary algebra on dense matrices
//!
//! All operations allocate a fresh result and leave their operands untouched.

use super::DenseMatrix;
use crate::error::{LinsysError, Result};
use crate::traits::{LinearOperator, max_or_nan};
use ndarray::Array1;

impl DenseMatrix {
    /// Matrix product `A * B`
    ///
    /// Requires `a.width() == b.height()`. The result is `b.width() x a.height()`
    /// and is never flagged as augmented.
    pub fn multiply(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        if a.width != b.height {
            return Err(LinsysError::dimension("multiply", a.width, b.height));
        }
        let mut c = DenseMatrix::try_zeros(b.width, a.height)?;
        for y in 0..a.height {
            for x in 0..b.width {
                let mut sum = 0.0;
                for k in 0..a.width {
                    sum += a.at(k, y) * b.at(x, k);
                }
                c.data[x + c.width * y] = sum;
            }
        }
        Ok(c)
    }

    /// Elementwise sum `A + B`
    pub fn add(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        Self::zip_with(a, b, "add", |l, r| l + r)
    }

    /// Elementwise difference `A - B`
    pub fn subtract(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        Self::zip_with(a, b, "subtract", |l, r| l - r)
    }

    fn zip_with(
        a: &DenseMatrix,
        b: &DenseMatrix,
        operation: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<DenseMatrix> {
        if a.width != b.width || a.height != b.height {
            return Err(LinsysError::shape(
                operation,
                (a.width, a.height),
                (b.width, b.height),
            ));
        }
        let data = a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(l, r)| f(*l, *r))
            .collect();
        Ok(DenseMatrix {
            data,
            width: a.width,
            height: a.height,
            augmented: a.augmented,
        })
    }

    /// Checked matrix-vector product `A * x`
    pub fn matvec(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.width {
            return Err(LinsysError::dimension("matvec", self.width, x.len()));
        }
        Ok(self.apply(x))
    }

    /// Largest absolute difference between two equally shaped matrices
    pub fn max_abs_diff(a: &DenseMatrix, b: &DenseMatrix) -> Result<f64> {
        let diff = Self::subtract(a, b)?;
        Ok(diff.data.iter().fold(0.0_f64, |m, v| max_or_nan(m, v.abs())))
    }
}

impl LinearOperator for DenseMatrix {
    fn num_rows(&self) -> usize {
        self.height
    }

    fn num_cols(&self) -> usize {
        self.width
    }

    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        assert_eq!(x.len(), self.width, "vector length must match matrix width");
        Array1::from_iter((0..self.height).map(|y| {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            row.iter().zip(x.iter()).map(|(a, xi)| a * xi).sum::<f64>()
        }))
    }

    fn apply_transpose(&self, x: &Array1<f64>) -> Array1<f64> {
        assert_eq!(
            x.len(),
            self.height,
            "vector length must match matrix height"
        );
        let mut y = Array1::zeros(self.width);
        for row in 0..self.height {
            let xi = x[row];
            for col in 0..self.width {
                y[col] += self.at(col, row) * xi;
            }
        }
        y
    }
}
