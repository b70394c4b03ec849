//! Pivoted LU decomposition
//!
//! Produces `P * A = L * U` for any (possibly rectangular, singular or
//! augmented) matrix `A`. Row interchanges only happen when the entry in the
//! current pivot position is zero; when a whole column below the pivot row is
//! zero the column is skipped and the pivot row stays where it is, which is how
//! rank deficiency shows up in `U`. The sub-tolerance entries of a skipped
//! column are cleared to exact zeros, so `P * A = L * U` holds up to those
//! entries (exactly when the tolerance is `0.0`).
//!
//! Each step is expressed as a product with an elementary matrix built through
//! [`DenseMatrix::map_elements`], so no input is ever mutated.

use crate::dense::DenseMatrix;
use crate::error::Result;

/// Default absolute threshold below which an entry counts as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Result of a pivoted LU decomposition.
///
/// `p` and `l` are `n x n` with `n = A.height()`, `u` has the shape of `A`.
#[derive(Debug, Clone)]
pub struct LuFactorization {
    /// Row permutation, `P * A = L * U`
    pub p: DenseMatrix,
    /// Unit lower-triangular factor
    pub l: DenseMatrix,
    /// Upper-triangular (row echelon) factor, keeps the augmented flag of `A`
    pub u: DenseMatrix,
    /// Number of row interchanges performed
    pub swaps: usize,
}

impl LuFactorization {
    /// `L * U`
    pub fn reconstruct(&self) -> Result<DenseMatrix> {
        DenseMatrix::multiply(&self.l, &self.u)
    }

    /// `P * A`, the row-permuted input that `L * U` reproduces
    pub fn permute(&self, a: &DenseMatrix) -> Result<DenseMatrix> {
        DenseMatrix::multiply(&self.p, a)
    }
}

#[inline]
fn is_zero(value: f64, tolerance: f64) -> bool {
    value.abs() <= tolerance
}

/// Identity with rows `r1` and `r2` exchanged
fn swap_matrix(n: usize, r1: usize, r2: usize) -> DenseMatrix {
    DenseMatrix::identity(n).map_elements(|x, y, v| {
        if y == r1 {
            if x == r2 { 1.0 } else { 0.0 }
        } else if y == r2 {
            if x == r1 { 1.0 } else { 0.0 }
        } else {
            v
        }
    })
}

/// Identity with the negated multipliers of column `pivot_col` of `u`
/// placed below `pivot_row`
fn elimination_matrix(u: &DenseMatrix, pivot_col: usize, pivot_row: usize) -> DenseMatrix {
    let n = u.height();
    let pivot = u.at(pivot_col, pivot_row);
    DenseMatrix::identity(n).map_elements(|x, y, v| {
        if x == pivot_row && y > pivot_row {
            -u.at(pivot_col, y) / pivot
        } else {
            v
        }
    })
}

/// Compute the pivoted LU decomposition of `a`.
///
/// Entries with `|v| <= tolerance` are treated as zero when choosing pivots;
/// `0.0` gives exact comparison.
pub fn lu_decompose(a: &DenseMatrix, tolerance: f64) -> Result<LuFactorization> {
    let n = a.height();
    let identity = DenseMatrix::identity(n);
    let mut u = a.clone();
    let mut l = identity.clone();
    let mut p = identity.clone();
    let mut swaps = 0;
    let mut pivot_row = 0;

    for col in 0..a.width() {
        if pivot_row >= n {
            break;
        }

        if is_zero(u.at(col, pivot_row), tolerance) {
            let candidate = (pivot_row + 1..n).find(|&y| !is_zero(u.at(col, y), tolerance));
            let Some(k) = candidate else {
                log::debug!("column {col}: no pivot at or below row {pivot_row}");
                // Sub-tolerance leftovers must not resurface as pivots after
                // later eliminations scale them up
                u = u.map_elements(|x, y, v| if x == col && y >= pivot_row { 0.0 } else { v });
                continue;
            };

            log::debug!("column {col}: swapping rows {pivot_row} and {k}");
            let s = swap_matrix(n, pivot_row, k);
            u = DenseMatrix::multiply(&s, &u)?.with_augmented(a.is_augmented());
            // Re-thread the multipliers gathered so far through the swap
            let below = DenseMatrix::subtract(&l, &identity)?;
            l = DenseMatrix::add(&DenseMatrix::multiply(&s, &below)?, &identity)?;
            p = DenseMatrix::multiply(&s, &p)?;
            swaps += 1;
        }

        let step = elimination_matrix(&u, col, pivot_row);
        u = DenseMatrix::multiply(&step, &u)?;
        // Annihilated entries are exact zeros, not rounding residue
        u = u.map_elements(|x, y, v| if x == col && y > pivot_row { 0.0 } else { v });
        u.set_augmented(a.is_augmented());
        l = DenseMatrix::multiply(&l, &step)?;

        log::debug!(
            "column {col}: pivot {:.6e} at row {pivot_row}",
            u.at(col, pivot_row)
        );
        pivot_row += 1;
    }

    // The elementary matrices carry negated multipliers
    let l = l.map_elements(|x, y, v| if x != y { -v } else { v });

    Ok(LuFactorization { p, l, u, swaps })
}
