//! Augmented system solver
//!
//! Takes an augmented matrix `[A | b]` through the whole pipeline:
//!
//! 1. pivoted LU decomposition ([`crate::direct::lu_decompose`])
//! 2. pivot/rank analysis of `U` ([`crate::rank::analyze_pivots`])
//! 3. `defect + 1` backward substitutions ([`crate::substitution`]), fanned
//!    out through [`crate::parallel::run_indexed`] when requested
//!
//! The result is a [`SolveReport`] whose `Display` output is the report shown
//! to the user.

use crate::dense::DenseMatrix;
use crate::direct::{DEFAULT_TOLERANCE, LuFactorization, lu_decompose};
use crate::error::{LinsysError, Result};
use crate::parallel::{ExecutionMode, run_indexed};
use crate::rank::{PivotAnalysis, analyze_pivots};
use crate::substitution::{Target, back_substitute};
use crate::traits::{LinearOperator, max_or_nan};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// How substitution runs are executed
    pub execution: ExecutionMode,
    /// Worker threads for parallel execution (0 = rayon default)
    pub threads: usize,
    /// Absolute threshold below which an entry counts as zero
    pub tolerance: f64,
    /// Verbosity level (0 = quiet, 1 = summary, 2+ = detailed)
    pub verbosity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::Sequential,
            threads: 0,
            tolerance: DEFAULT_TOLERANCE,
            verbosity: 0,
        }
    }
}

impl SolverConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: SolverConfig = serde_json::from_str(&contents)
            .map_err(|e| LinsysError::Config(format!("failed to parse JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LinsysError::Config(format!("failed to serialize config: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings the solver cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(LinsysError::Config(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Affine solution space `{particular + sum c_i * kernel_i}`
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSet {
    /// One solution of `Ax = b` (free variables set to zero)
    pub particular: Array1<f64>,
    /// Basis of the null space of `A`, one vector per free variable
    pub kernel: Vec<Array1<f64>>,
}

impl SolutionSet {
    /// Whether the solution is unique
    pub fn is_unique(&self) -> bool {
        self.kernel.is_empty()
    }

    /// Evaluate `particular + sum coefficients[i] * kernel[i]`
    pub fn combine(&self, coefficients: &[f64]) -> Result<Array1<f64>> {
        if coefficients.len() != self.kernel.len() {
            return Err(LinsysError::dimension(
                "combine",
                self.kernel.len(),
                coefficients.len(),
            ));
        }
        let mut x = self.particular.clone();
        for (c, k) in coefficients.iter().zip(&self.kernel) {
            x.scaled_add(*c, k);
        }
        Ok(x)
    }

    /// Largest residual entry of `A x - b` over the particular solution and
    /// `A k` over every kernel vector
    pub fn max_residual(&self, a: &impl LinearOperator, b: &Array1<f64>) -> f64 {
        let zero = Array1::zeros(b.len());
        self.kernel
            .iter()
            .map(|k| a.residual_max(k, &zero))
            .fold(a.residual_max(&self.particular, b), max_or_nan)
    }
}

/// Terminal result of a solve
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The right-hand side is inconsistent with `A`
    NoSolution,
    /// The system has at least one solution
    Solved(SolutionSet),
}

/// Everything produced by one solve, in report order
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The augmented input matrix
    pub input: DenseMatrix,
    /// Factorization of the input
    pub factors: LuFactorization,
    /// Pivot structure of `U`
    pub analysis: PivotAnalysis,
    /// Solution set or the no-solution notice
    pub outcome: Outcome,
}

impl SolveReport {
    /// Number of pivot columns
    pub fn rank(&self) -> usize {
        self.analysis.rank()
    }

    /// Number of free variables
    pub fn defect(&self) -> usize {
        self.analysis.defect()
    }

    /// Solution set, if the system is solvable
    pub fn solution(&self) -> Option<&SolutionSet> {
        match &self.outcome {
            Outcome::Solved(set) => Some(set),
            Outcome::NoSolution => None,
        }
    }

    /// Machine-readable form of the report
    pub fn to_json(&self) -> serde_json::Value {
        let rows = |m: &DenseMatrix| -> Vec<Vec<f64>> {
            (0..m.height())
                .map(|y| (0..m.width()).map(|x| m.at(x, y)).collect())
                .collect()
        };
        let solution = self.solution().map(|set| {
            serde_json::json!({
                "particular": set.particular.to_vec(),
                "kernel": set.kernel.iter().map(|k| k.to_vec()).collect::<Vec<_>>(),
            })
        });
        serde_json::json!({
            "input": rows(&self.input),
            "upper": rows(&self.factors.u),
            "pivots": self.analysis.pivots,
            "rank": self.rank(),
            "defect": self.defect(),
            "solvable": self.analysis.is_solvable(),
            "solution": solution,
        })
    }
}

fn write_vector(f: &mut fmt::Formatter<'_>, v: &Array1<f64>) -> fmt::Result {
    write!(f, "(")?;
    for (i, value) in v.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, " {value:.4}")?;
    }
    writeln!(f, " )")
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input matrix:")?;
        write!(f, "{}", self.input)?;
        writeln!(f, "Upper triangular factor:")?;
        write!(f, "{}", self.factors.u)?;

        let columns: Vec<String> = self
            .analysis
            .pivot_columns()
            .iter()
            .map(|c| c.to_string())
            .collect();
        writeln!(f, "Pivot columns: [{}]", columns.join(", "))?;

        match &self.outcome {
            Outcome::NoSolution => writeln!(f, "The system has no solution."),
            Outcome::Solved(set) => {
                write!(f, "Particular solution: ")?;
                write_vector(f, &set.particular)?;
                if !set.is_unique() {
                    writeln!(f, "Kernel basis ({} vectors):", set.kernel.len())?;
                    for k in &set.kernel {
                        write!(f, "  ")?;
                        write_vector(f, k)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Solve the augmented system `[A | b]`.
///
/// ```
/// use math_audio_linsys::{DenseMatrix, SolverConfig, solve};
///
/// let m = DenseMatrix::from_rows(3, 2, &[1.0, 1.0, 3.0, 1.0, -1.0, 1.0])
///     .unwrap()
///     .with_augmented(true);
/// let report = solve(&m, &SolverConfig::default()).unwrap();
/// let set = report.solution().unwrap();
/// assert!((set.particular[0] - 2.0).abs() < 1e-12);
/// assert!(set.is_unique());
/// ```
pub fn solve(matrix: &DenseMatrix, config: &SolverConfig) -> Result<SolveReport> {
    if matrix.width() < 2 || matrix.height() == 0 {
        return Err(LinsysError::Dimension {
            operation: "solve",
            expected: "at least 2x1".to_string(),
            got: format!("{}x{}", matrix.width(), matrix.height()),
        });
    }
    config.validate()?;
    let start = Instant::now();

    let mut input = matrix.clone();
    input.set_augmented(true);

    let factors = lu_decompose(&input, config.tolerance)?;
    let analysis = analyze_pivots(&factors.u, config.tolerance);

    if config.verbosity > 0 {
        log::info!(
            "System: {} equations, {} unknowns, rank {}, defect {}, {} row swaps",
            input.height(),
            analysis.num_variables,
            analysis.rank(),
            analysis.defect(),
            factors.swaps
        );
    }

    let outcome = if analysis.is_solvable() {
        Outcome::Solved(build_solution_set(&factors.u, &analysis, config)?)
    } else {
        log::warn!(
            "inconsistent system: row {} of U reduces to 0 = c with c != 0",
            analysis.augmented_pivot.unwrap_or_default()
        );
        Outcome::NoSolution
    };

    if config.verbosity > 0 {
        log::info!(
            "Solve finished in {:.3}ms ({:?})",
            start.elapsed().as_secs_f64() * 1000.0,
            config.execution
        );
    }

    Ok(SolveReport {
        input,
        factors,
        analysis,
        outcome,
    })
}

/// Run the `defect + 1` backward substitutions over `u`.
pub fn build_solution_set(
    u: &DenseMatrix,
    analysis: &PivotAnalysis,
    config: &SolverConfig,
) -> Result<SolutionSet> {
    let rhs = u.column(u.width() - 1)?;
    let tasks = analysis.defect() + 1;

    if config.verbosity > 1 {
        log::info!("Running {tasks} substitution tasks ({:?})", config.execution);
    }

    let mut vectors = run_indexed(tasks, config.execution, config.threads, |i| {
        back_substitute(u, &rhs, analysis, Target::from_task_index(i))
    })?
    .into_iter();

    let particular = vectors
        .next()
        .ok_or_else(|| LinsysError::dimension("build_solution_set", tasks, 0))?;

    Ok(SolutionSet {
        particular,
        kernel: vectors.collect(),
    })
}
