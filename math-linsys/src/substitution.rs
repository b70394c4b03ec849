//! Backward substitution over a row echelon factor
//!
//! One run produces either the particular solution (all free variables set to
//! zero, target `b`) or the `j`-th kernel basis vector (free variable `j` set
//! to one, the others to zero, target `0`). Runs only read `U`, `b` and the
//! pivot list, so any number of them may execute concurrently.

use crate::dense::DenseMatrix;
use crate::error::{LinsysError, Result};
use crate::rank::PivotAnalysis;
use ndarray::Array1;

/// Which vector of the solution set a substitution run computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Particular solution of `Ux = b`
    Particular,
    /// Kernel basis vector for the `j`-th free variable (by ascending column)
    Kernel(usize),
}

impl Target {
    /// Map a task index to a target: `0` is the particular solution, `i > 0`
    /// is kernel vector `i - 1`.
    pub fn from_task_index(index: usize) -> Self {
        match index {
            0 => Target::Particular,
            i => Target::Kernel(i - 1),
        }
    }

    fn free_selector(self) -> Option<usize> {
        match self {
            Target::Particular => None,
            Target::Kernel(j) => Some(j),
        }
    }
}

/// Solve `U x = target` by backward substitution.
///
/// `rhs` is the right-hand side column of `u` (length `u.height()`). For
/// [`Target::Kernel`] it is ignored in favour of the zero vector.
pub fn back_substitute(
    u: &DenseMatrix,
    rhs: &Array1<f64>,
    analysis: &PivotAnalysis,
    target: Target,
) -> Result<Array1<f64>> {
    if rhs.len() != u.height() {
        return Err(LinsysError::dimension("back_substitute", u.height(), rhs.len()));
    }
    let n = analysis.num_variables;
    if n + 1 != u.width() {
        return Err(LinsysError::dimension("back_substitute", n + 1, u.width()));
    }

    let selector = target.free_selector();
    if let Some(j) = selector.filter(|&j| j >= analysis.defect()) {
        return Err(LinsysError::Index {
            x: j,
            y: 0,
            width: analysis.defect(),
            height: 1,
        });
    }

    // Free-variable number of each column, walking from the right
    let mut free_index = analysis.defect();
    let mut pivot_stack: Vec<_> = analysis.pivots.clone();
    let mut x = Array1::<f64>::zeros(n);

    for col in (0..n).rev() {
        let r = match pivot_stack.last() {
            Some(p) if p.column == col => p.row,
            _ => {
                free_index -= 1;
                x[col] = if selector == Some(free_index) { 1.0 } else { 0.0 };
                continue;
            }
        };
        pivot_stack.pop();

        let mut sum = 0.0;
        for k in col + 1..n {
            sum += u.get(k, r)? * x[k];
        }
        let b = match target {
            Target::Particular => rhs[r],
            Target::Kernel(_) => 0.0,
        };
        x[col] = (b - sum) / u.get(col, r)?;
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::DEFAULT_TOLERANCE;
    use crate::rank::analyze_pivots;
    use crate::traits::LinearOperator;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn setup(
        width: usize,
        height: usize,
        rows: &[f64],
    ) -> (DenseMatrix, Array1<f64>, PivotAnalysis) {
        let u = DenseMatrix::from_rows(width, height, rows)
            .unwrap()
            .with_augmented(true);
        let rhs = u.column(width - 1).unwrap();
        let analysis = analyze_pivots(&u, DEFAULT_TOLERANCE);
        (u, rhs, analysis)
    }

    #[test]
    fn test_unique_solution() {
        // x + y = 3, -2y = -2
        let (u, rhs, analysis) = setup(3, 2, &[1.0, 1.0, 3.0, 0.0, -2.0, -2.0]);
        let x = back_substitute(&u, &rhs, &analysis, Target::Particular).unwrap();
        assert_relative_eq!(x[0], 2.0);
        assert_relative_eq!(x[1], 1.0);
    }

    #[test]
    fn test_particular_and_kernel() {
        // x0 + x1 + x2 = 2
        let (u, rhs, analysis) = setup(4, 2, &[1.0, 1.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);

        let p = back_substitute(&u, &rhs, &analysis, Target::Particular).unwrap();
        assert_eq!(p, array![2.0, 0.0, 0.0]);

        let k0 = back_substitute(&u, &rhs, &analysis, Target::Kernel(0)).unwrap();
        let k1 = back_substitute(&u, &rhs, &analysis, Target::Kernel(1)).unwrap();
        assert_eq!(k0, array![-1.0, 1.0, 0.0]);
        assert_eq!(k1, array![-1.0, 0.0, 1.0]);

        let a = u.drop_last_column();
        for k in [&k0, &k1] {
            assert_relative_eq!(a.residual_max(k, &array![0.0, 0.0]), 0.0);
        }
    }

    #[test]
    fn test_leading_free_column() {
        // x0 free; x1 + 2 x2 = 1; 3 x2 = 3
        let (u, rhs, analysis) = setup(4, 2, &[0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 3.0, 3.0]);

        let p = back_substitute(&u, &rhs, &analysis, Target::Particular).unwrap();
        assert_relative_eq!(p[0], 0.0);
        assert_relative_eq!(p[1], -1.0);
        assert_relative_eq!(p[2], 1.0);

        let k = back_substitute(&u, &rhs, &analysis, Target::Kernel(0)).unwrap();
        assert_eq!(k, array![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_kernel_out_of_range() {
        let (u, rhs, analysis) = setup(3, 2, &[1.0, 1.0, 3.0, 0.0, -2.0, -2.0]);
        let err = back_substitute(&u, &rhs, &analysis, Target::Kernel(0)).unwrap_err();
        assert!(err.is_index_error());
    }

    #[test]
    fn test_rhs_length_mismatch() {
        let (u, _, analysis) = setup(3, 2, &[1.0, 1.0, 3.0, 0.0, -2.0, -2.0]);
        let err = back_substitute(&u, &array![1.0], &analysis, Target::Particular).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_task_index_mapping() {
        assert_eq!(Target::from_task_index(0), Target::Particular);
        assert_eq!(Target::from_task_index(1), Target::Kernel(0));
        assert_eq!(Target::from_task_index(3), Target::Kernel(2));
    }
}
