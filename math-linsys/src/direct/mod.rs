//! Direct factorizations
//!
//! - [`lu_decompose`]: LU decomposition with row interchanges on zero pivots,
//!   accepting rectangular and rank-deficient input

mod lu;

pub use lu::{DEFAULT_TOLERANCE, LuFactorization, lu_decompose};
