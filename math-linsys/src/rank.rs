//! Pivot and rank analysis of an upper-triangular factor
//!
//! The analyzer walks the columns of an augmented `U = [U_A | c]` and, for each
//! column, scans its rows bottom-up for the first unclaimed row holding a
//! non-zero entry. That row becomes the column's pivot row. Coefficient
//! columns without a pivot are free variables; a pivot in the augmented column
//! means some row reads `0 = c` with `c != 0`, i.e. the system is inconsistent.

use crate::dense::DenseMatrix;
use serde::Serialize;

/// A structural pivot of `U`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pivot {
    /// Column (variable) index
    pub column: usize,
    /// Row of `U` holding the pivot
    pub row: usize,
}

/// Pivot structure of an augmented upper-triangular factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotAnalysis {
    /// Pivots of the coefficient columns, by increasing column index
    pub pivots: Vec<Pivot>,
    /// Number of unknowns (`U.width() - 1`)
    pub num_variables: usize,
    /// Row at which the right-hand side column carries a pivot, if any
    pub augmented_pivot: Option<usize>,
}

impl PivotAnalysis {
    /// Number of pivot columns
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Number of free variables
    pub fn defect(&self) -> usize {
        self.num_variables - self.rank()
    }

    /// `true` unless the right-hand side column is itself a pivot column
    pub fn is_solvable(&self) -> bool {
        self.augmented_pivot.is_none()
    }

    /// Indices of the pivot columns
    pub fn pivot_columns(&self) -> Vec<usize> {
        self.pivots.iter().map(|p| p.column).collect()
    }

    /// Indices of the free (non-pivot) columns, ascending
    pub fn free_columns(&self) -> Vec<usize> {
        let mut pivots = self.pivots.iter().map(|p| p.column).peekable();
        (0..self.num_variables)
            .filter(|&col| {
                if pivots.peek() == Some(&col) {
                    pivots.next();
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// Pivot row of `column`, if it is a pivot column
    pub fn pivot_row(&self, column: usize) -> Option<usize> {
        self.pivots
            .binary_search_by_key(&column, |p| p.column)
            .ok()
            .map(|i| self.pivots[i].row)
    }
}

/// Scan the augmented upper-triangular factor `u` for pivots.
///
/// Entries with `|v| <= tolerance` count as zero. A matrix with zero width
/// yields an empty analysis with no variables.
pub fn analyze_pivots(u: &DenseMatrix, tolerance: f64) -> PivotAnalysis {
    let width = u.width();
    let num_variables = width.saturating_sub(1);
    let mut claimed = vec![false; u.height()];
    let mut pivots = Vec::new();
    let mut augmented_pivot = None;

    for x in 0..width {
        let found = (0..u.height())
            .rev()
            .find(|&y| !claimed[y] && u.at(x, y).abs() > tolerance);

        if let Some(y) = found {
            claimed[y] = true;
            if x < num_variables {
                pivots.push(Pivot { column: x, row: y });
            } else {
                augmented_pivot = Some(y);
            }
        }
    }

    PivotAnalysis {
        pivots,
        num_variables,
        augmented_pivot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::{DEFAULT_TOLERANCE, lu_decompose};

    fn augmented(width: usize, height: usize, rows: &[f64]) -> DenseMatrix {
        DenseMatrix::from_rows(width, height, rows)
            .unwrap()
            .with_augmented(true)
    }

    #[test]
    fn test_full_rank() {
        let u = augmented(3, 2, &[1.0, 1.0, 3.0, 0.0, -2.0, -2.0]);
        let a = analyze_pivots(&u, DEFAULT_TOLERANCE);

        assert_eq!(
            a.pivots,
            vec![Pivot { column: 0, row: 0 }, Pivot { column: 1, row: 1 }]
        );
        assert_eq!(a.rank(), 2);
        assert_eq!(a.defect(), 0);
        assert!(a.is_solvable());
        assert!(a.free_columns().is_empty());
    }

    #[test]
    fn test_rank_deficient() {
        let u = augmented(4, 2, &[1.0, 1.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        let a = analyze_pivots(&u, DEFAULT_TOLERANCE);

        assert_eq!(a.pivot_columns(), vec![0]);
        assert_eq!(a.free_columns(), vec![1, 2]);
        assert_eq!(a.rank(), 1);
        assert_eq!(a.defect(), 2);
        assert!(a.is_solvable());
        assert_eq!(a.pivot_row(0), Some(0));
        assert_eq!(a.pivot_row(1), None);
    }

    #[test]
    fn test_inconsistent() {
        let u = augmented(3, 2, &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        let a = analyze_pivots(&u, DEFAULT_TOLERANCE);

        assert_eq!(a.rank(), 0);
        assert_eq!(a.defect(), 2);
        assert_eq!(a.augmented_pivot, Some(0));
        assert!(!a.is_solvable());
    }

    #[test]
    fn test_pivot_in_later_column() {
        // x0 is free, x1 and x2 carry pivots
        let u = augmented(4, 3, &[
            0.0, 1.0, 2.0, 1.0, //
            0.0, 0.0, 3.0, 1.0, //
            0.0, 0.0, 0.0, 0.0,
        ]);
        let a = analyze_pivots(&u, DEFAULT_TOLERANCE);

        assert_eq!(
            a.pivots,
            vec![Pivot { column: 1, row: 0 }, Pivot { column: 2, row: 1 }]
        );
        assert_eq!(a.free_columns(), vec![0]);
        assert!(a.is_solvable());
    }

    #[test]
    fn test_rank_bounds_after_lu() {
        let m = augmented(4, 3, &[
            1.0, 2.0, 3.0, 1.0, //
            2.0, 4.0, 6.0, 2.0, //
            1.0, 0.0, 1.0, 5.0,
        ]);
        let f = lu_decompose(&m, DEFAULT_TOLERANCE).unwrap();
        let a = analyze_pivots(&f.u, DEFAULT_TOLERANCE);

        assert!(a.rank() <= a.num_variables.min(m.height()));
        assert_eq!(a.rank(), 2);
        assert_eq!(a.defect(), 1);
        assert!(a.is_solvable());
    }

    #[test]
    fn test_tolerance_affects_rank() {
        let u = augmented(3, 2, &[1.0, 1.0, 1.0, 0.0, 1e-14, 0.0]);
        assert_eq!(analyze_pivots(&u, DEFAULT_TOLERANCE).rank(), 1);
        assert_eq!(analyze_pivots(&u, 0.0).rank(), 2);
    }

    #[test]
    fn test_empty_matrix() {
        let u = DenseMatrix::zeros(0, 0);
        let a = analyze_pivots(&u, DEFAULT_TOLERANCE);
        assert_eq!(a.num_variables, 0);
        assert_eq!(a.rank(), 0);
        assert!(a.is_solvable());
    }
}
