//! Dense matrix storage
//!
//! [`DenseMatrix`] owns a flat row-major `Vec<f64>`. Coordinates follow the
//! `(x, y)` convention: `x` is the column, `y` the row, and element `(x, y)`
//! lives at offset `x + width * y`.
//!
//! A matrix can be flagged as *augmented*, meaning its last column holds the
//! right-hand side `b` of a system `Ax = b`. The flag only affects display and
//! is preserved by [`DenseMatrix::transpose`]; algebraic products never set it.

mod ops;

use crate::error::{LinsysError, Result};
use ndarray::{Array1, Array2};
use std::fmt;

/// Dense real matrix with value semantics.
///
/// `Clone` performs a deep copy of the buffer; no two matrices ever share
/// storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<f64>,
    width: usize,
    height: usize,
    augmented: bool,
}

/// `width * height`, or a dimension error when it does not fit in `usize`
pub(crate) fn element_count(operation: &'static str, width: usize, height: usize) -> Result<usize> {
    width.checked_mul(height).ok_or_else(|| LinsysError::Dimension {
        operation,
        expected: "a size that fits in memory".to_string(),
        got: format!("{width}x{height}"),
    })
}

impl DenseMatrix {
    /// Create a `width x height` matrix filled with zeros
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`, like `vec!`; use
    /// [`DenseMatrix::try_zeros`] for sizes taken from untrusted input.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
            augmented: false,
        }
    }

    /// Create a `width x height` matrix filled with zeros, failing with
    /// [`LinsysError::Dimension`] when the element count overflows
    pub fn try_zeros(width: usize, height: usize) -> Result<Self> {
        let len = element_count("zeros", width, height)?;
        Ok(Self {
            data: vec![0.0; len],
            width,
            height,
            augmented: false,
        })
    }

    /// Create the `n x n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i + n * i] = 1.0;
        }
        m
    }

    /// Create a matrix from a row-major slice
    ///
    /// ```
    /// use math_audio_linsys::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(m.get(2, 0).unwrap(), 3.0);
    /// assert_eq!(m.get(0, 1).unwrap(), 4.0);
    /// ```
    pub fn from_rows(width: usize, height: usize, row_major: &[f64]) -> Result<Self> {
        Self::from_vec(width, height, row_major.to_vec())
    }

    /// Create a matrix from an owned row-major buffer
    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        let len = element_count("from_vec", width, height)?;
        if data.len() != len {
            return Err(LinsysError::dimension("from_vec", len, data.len()));
        }
        Ok(Self {
            data,
            width,
            height,
            augmented: false,
        })
    }

    /// Create an augmented matrix `[A | b]`
    pub fn augment(a: &DenseMatrix, b: &Array1<f64>) -> Result<Self> {
        if b.len() != a.height {
            return Err(LinsysError::dimension("augment", a.height, b.len()));
        }
        let width = a.width + 1;
        let mut m = Self::try_zeros(width, a.height)?;
        for y in 0..a.height {
            let src = &a.data[y * a.width..(y + 1) * a.width];
            m.data[y * width..y * width + a.width].copy_from_slice(src);
            m.data[y * width + a.width] = b[y];
        }
        m.augmented = true;
        Ok(m)
    }

    /// Convert from an ndarray matrix (`nrows` becomes the height)
    pub fn from_array2(array: &Array2<f64>) -> Self {
        let (height, width) = array.dim();
        Self {
            data: array.iter().copied().collect(),
            width,
            height,
            augmented: false,
        }
    }

    /// Convert to an ndarray matrix of shape `(height, width)`
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.height, self.width), |(y, x)| self.at(x, y))
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the last column is the right-hand side of a system
    #[inline]
    pub fn is_augmented(&self) -> bool {
        self.augmented
    }

    /// Set the augmented display flag
    pub fn set_augmented(&mut self, augmented: bool) {
        self.augmented = augmented;
    }

    /// Builder-style variant of [`DenseMatrix::set_augmented`]
    pub fn with_augmented(mut self, augmented: bool) -> Self {
        self.augmented = augmented;
        self
    }

    /// Whether `width == height`
    #[inline]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Row-major view of the buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(LinsysError::Index {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(x + self.width * y)
    }

    /// Read element `(x, y)` where the caller already guarantees the bounds.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> f64 {
        self.data[x + self.width * y]
    }

    /// Element at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> Result<f64> {
        let i = self.offset(x, y)?;
        Ok(self.data[i])
    }

    /// Overwrite element at column `x`, row `y`
    pub fn set(&mut self, x: usize, y: usize, value: f64) -> Result<()> {
        let i = self.offset(x, y)?;
        self.data[i] = value;
        Ok(())
    }

    /// Copy of row `y`
    pub fn row(&self, y: usize) -> Result<Array1<f64>> {
        if y >= self.height {
            return Err(LinsysError::Index {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(Array1::from(
            self.data[y * self.width..(y + 1) * self.width].to_vec(),
        ))
    }

    /// Copy of column `x`
    pub fn column(&self, x: usize) -> Result<Array1<f64>> {
        if x >= self.width {
            return Err(LinsysError::Index {
                x,
                y: 0,
                width: self.width,
                height: self.height,
            });
        }
        Ok(Array1::from_iter((0..self.height).map(|y| self.at(x, y))))
    }

    /// Replace row `y`
    pub fn set_row(&mut self, y: usize, values: &Array1<f64>) -> Result<()> {
        if values.len() != self.width {
            return Err(LinsysError::dimension("set_row", self.width, values.len()));
        }
        if y >= self.height {
            return Err(LinsysError::Index {
                x: 0,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let start = y * self.width;
        for (dst, src) in self.data[start..start + self.width]
            .iter_mut()
            .zip(values.iter())
        {
            *dst = *src;
        }
        Ok(())
    }

    /// Replace column `x`
    pub fn set_column(&mut self, x: usize, values: &Array1<f64>) -> Result<()> {
        if values.len() != self.height {
            return Err(LinsysError::dimension(
                "set_column",
                self.height,
                values.len(),
            ));
        }
        if x >= self.width {
            return Err(LinsysError::Index {
                x,
                y: 0,
                width: self.width,
                height: self.height,
            });
        }
        for (y, v) in values.iter().enumerate() {
            self.data[x + self.width * y] = *v;
        }
        Ok(())
    }

    /// New matrix with rows and columns swapped; keeps the augmented flag
    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                t.data[y + t.width * x] = self.at(x, y);
            }
        }
        t.augmented = self.augmented;
        t
    }

    /// Copy without the last column, i.e. the coefficient matrix `A` of `[A | b]`
    pub fn drop_last_column(&self) -> Self {
        let width = self.width.saturating_sub(1);
        let mut m = Self::zeros(width, self.height);
        for y in 0..self.height {
            m.data[y * width..(y + 1) * width]
                .copy_from_slice(&self.data[y * self.width..y * self.width + width]);
        }
        m
    }

    /// New matrix where every element becomes `f(x, y, old)`
    ///
    /// ```
    /// use math_audio_linsys::DenseMatrix;
    ///
    /// // Swap rows 0 and 2 of the 3x3 identity
    /// let s = DenseMatrix::identity(3).map_elements(|x, y, v| match y {
    ///     0 => if x == 2 { 1.0 } else { 0.0 },
    ///     2 => if x == 0 { 1.0 } else { 0.0 },
    ///     _ => v,
    /// });
    /// assert_eq!(s.get(2, 0).unwrap(), 1.0);
    /// assert_eq!(s.get(1, 1).unwrap(), 1.0);
    /// ```
    pub fn map_elements<F>(&self, f: F) -> Self
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(f(x, y, self.at(x, y)));
            }
        }
        Self {
            data,
            width: self.width,
            height: self.height,
            augmented: self.augmented,
        }
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            write!(f, "( ")?;
            for x in 0..self.width {
                if self.augmented && x + 1 == self.width {
                    write!(f, "| ")?;
                }
                write!(f, "{:.2} ", self.at(x, y))?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> DenseMatrix {
        DenseMatrix::from_rows(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_zeros_and_identity() {
        let z = DenseMatrix::zeros(3, 2);
        assert_eq!(z.width(), 3);
        assert_eq!(z.height(), 2);
        assert!(z.as_slice().iter().all(|v| *v == 0.0));

        let id = DenseMatrix::identity(3);
        assert!(id.is_square());
        assert!(!id.is_augmented());
        for y in 0..3 {
            for x in 0..3 {
                let expected = if x == y { 1.0 } else { 0.0 };
                assert_eq!(id.get(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_from_vec_wrong_length() {
        let err = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_oversized_shape_rejected() {
        let err = DenseMatrix::from_vec(usize::MAX, 2, vec![1.0]).unwrap_err();
        assert!(err.is_dimension_error());
        assert!(DenseMatrix::try_zeros(usize::MAX, 2).unwrap_err().is_dimension_error());
        assert_eq!(DenseMatrix::try_zeros(3, 2).unwrap(), DenseMatrix::zeros(3, 2));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut m = sample();
        assert_eq!(m.get(1, 1).unwrap(), 5.0);
        m.set(1, 1, -5.0).unwrap();
        assert_eq!(m.get(1, 1).unwrap(), -5.0);

        assert!(m.get(3, 0).unwrap_err().is_index_error());
        assert!(m.get(0, 2).unwrap_err().is_index_error());
        assert!(m.set(5, 5, 1.0).unwrap_err().is_index_error());
    }

    #[test]
    fn test_row_and_column() {
        let m = sample();
        assert_eq!(m.row(1).unwrap(), array![4.0, 5.0, 6.0]);
        assert_eq!(m.column(2).unwrap(), array![3.0, 6.0]);
        assert!(m.row(2).unwrap_err().is_index_error());
        assert!(m.column(3).unwrap_err().is_index_error());
    }

    #[test]
    fn test_set_row_and_column() {
        let mut m = sample();
        m.set_row(0, &array![7.0, 8.0, 9.0]).unwrap();
        assert_eq!(m.row(0).unwrap(), array![7.0, 8.0, 9.0]);

        m.set_column(1, &array![-1.0, -2.0]).unwrap();
        assert_eq!(m.column(1).unwrap(), array![-1.0, -2.0]);

        assert!(m.set_row(0, &array![1.0]).unwrap_err().is_dimension_error());
        assert!(
            m.set_column(0, &array![1.0, 2.0, 3.0])
                .unwrap_err()
                .is_dimension_error()
        );
        assert!(m.set_row(4, &array![1.0, 2.0, 3.0]).unwrap_err().is_index_error());
        assert!(m.set_column(4, &array![1.0, 2.0]).unwrap_err().is_index_error());
    }

    #[test]
    fn test_transpose_keeps_flag() {
        let m = sample().with_augmented(true);
        let t = m.transpose();
        assert_eq!(t.width(), 2);
        assert_eq!(t.height(), 3);
        assert!(t.is_augmented());
        assert_eq!(t.get(1, 2).unwrap(), 6.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_drop_last_column() {
        let m = sample().with_augmented(true);
        let a = m.drop_last_column();
        assert_eq!(a.width(), 2);
        assert!(!a.is_augmented());
        assert_eq!(a.row(1).unwrap(), array![4.0, 5.0]);
    }

    #[test]
    fn test_augment() {
        let a = DenseMatrix::from_rows(2, 2, &[1.0, 1.0, 1.0, -1.0]).unwrap();
        let m = DenseMatrix::augment(&a, &array![3.0, 1.0]).unwrap();
        assert!(m.is_augmented());
        assert_eq!(m.as_slice(), &[1.0, 1.0, 3.0, 1.0, -1.0, 1.0]);
        assert_eq!(m.drop_last_column(), a);

        let err = DenseMatrix::augment(&a, &array![1.0]).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_map_elements_is_pure() {
        let m = sample();
        let doubled = m.map_elements(|_, _, v| 2.0 * v);
        assert_eq!(m.get(0, 0).unwrap(), 1.0);
        assert_eq!(doubled.get(2, 1).unwrap(), 12.0);

        let coords = m.map_elements(|x, y, _| (10 * y + x) as f64);
        assert_eq!(coords.get(2, 1).unwrap(), 12.0);
    }

    #[test]
    fn test_clone_is_deep() {
        let a = sample();
        let mut b = a.clone();
        b.set(0, 0, 100.0).unwrap();
        assert_eq!(a.get(0, 0).unwrap(), 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_array2_roundtrip() {
        let arr = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = DenseMatrix::from_array2(&arr);
        assert_eq!(m, sample());
        assert_eq!(m.to_array2(), arr);
    }

    #[test]
    fn test_display_augmented() {
        let m = DenseMatrix::from_rows(2, 1, &[1.0, 2.5]).unwrap().with_augmented(true);
        assert_eq!(m.to_string(), "( 1.00 | 2.50 )\n");

        let plain = DenseMatrix::identity(1);
        assert_eq!(plain.to_string(), "( 1.00 )\n");
    }
}
