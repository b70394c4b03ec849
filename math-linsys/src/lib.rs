//! Dense linear system solver with kernel support
//!
//! This crate solves `Ax = b` given as one augmented matrix `[A | b]`,
//! including rank-deficient systems with infinitely many solutions.
//!
//! # Features
//!
//! - **Dense Matrices**: row-major `f64` storage with checked access and basic algebra
//! - **Pivoted LU**: `P·A = L·U` for square, rectangular and singular inputs
//! - **Rank Analysis**: pivot columns, rank, defect and solvability of `U`
//! - **Solution Sets**: particular solution plus a basis of the null space
//! - **Parallel Substitution**: kernel vectors computed concurrently with rayon
//! - **Console Front End**: text-file and interactive matrix input, command menu
//!
//! # Example
//!
//! ```
//! use math_audio_linsys::{DenseMatrix, SolverConfig, solve};
//!
//! // x0 + x1 + x2 = 2, twice over
//! let m = DenseMatrix::from_rows(4, 2, &[1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 4.0])
//!     .unwrap()
//!     .with_augmented(true);
//!
//! let report = solve(&m, &SolverConfig::default()).unwrap();
//! assert_eq!(report.rank(), 1);
//! assert_eq!(report.solution().unwrap().kernel.len(), 2);
//! ```

pub mod command;
pub mod dense;
pub mod direct;
pub mod error;
pub mod io;
pub mod parallel;
pub mod rank;
pub mod solver;
pub mod substitution;
pub mod traits;

// Re-export main types
pub use dense::DenseMatrix;
pub use error::{LinsysError, Result};
pub use traits::LinearOperator;

// Re-export the solver pipeline
pub use direct::{DEFAULT_TOLERANCE, LuFactorization, lu_decompose};
pub use parallel::{ExecutionMode, run_indexed};
pub use rank::{Pivot, PivotAnalysis, analyze_pivots};
pub use solver::{Outcome, SolutionSet, SolveReport, SolverConfig, build_solution_set, solve};
pub use substitution::{Target, back_substitute};

// Re-export the front end
pub use command::{Command, CommandInterpreter};
pub use io::{parse_matrix, read_matrix_file};
