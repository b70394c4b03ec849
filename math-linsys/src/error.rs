//! Error types for the linear system solver.
//!
//! Every fallible operation in the crate returns [`Result`]. Shape and index
//! violations are reported as tagged variants instead of panics, so a caller
//! can tell a malformed input apart from an algorithmic defect.
//!
//! An inconsistent system is *not* an error: it is reported through
//! [`crate::solver::Outcome::NoSolution`].

use thiserror::Error;

/// Errors that can occur while building, factoring or solving a system.
#[derive(Debug, Error)]
pub enum LinsysError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {operation}: expected {expected}, got {got}")]
    Dimension {
        /// Name of the failing operation
        operation: &'static str,
        /// Expected size (or shape, rendered as `WxH`)
        expected: String,
        /// Size actually supplied
        got: String,
    },

    /// Element access outside of `[0, width) x [0, height)`.
    #[error("index ({x}, {y}) out of bounds for {width}x{height} matrix")]
    Index {
        /// Column index
        x: usize,
        /// Row index
        y: usize,
        /// Matrix width
        width: usize,
        /// Matrix height
        height: usize,
    },

    /// Malformed matrix text (file or console).
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending input
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or invalid solver configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, LinsysError>;

impl LinsysError {
    /// Shorthand for a [`LinsysError::Dimension`] with scalar sizes.
    pub(crate) fn dimension(operation: &'static str, expected: usize, got: usize) -> Self {
        LinsysError::Dimension {
            operation,
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Shorthand for a [`LinsysError::Dimension`] with `width x height` shapes.
    pub(crate) fn shape(
        operation: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    ) -> Self {
        LinsysError::Dimension {
            operation,
            expected: format!("{}x{}", expected.0, expected.1),
            got: format!("{}x{}", got.0, got.1),
        }
    }

    /// Returns `true` for shape mismatches.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, LinsysError::Dimension { .. })
    }

    /// Returns `true` for out-of-bounds accesses.
    pub fn is_index_error(&self) -> bool {
        matches!(self, LinsysError::Index { .. })
    }

    /// Returns `true` if the error was caused by user-supplied input
    /// (parse failures, I/O and configuration problems).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LinsysError::Parse { .. } | LinsysError::Io(_) | LinsysError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LinsysError::Index {
            x: 3,
            y: 1,
            width: 2,
            height: 2,
        };
        assert_eq!(err.to_string(), "index (3, 1) out of bounds for 2x2 matrix");

        let err = LinsysError::shape("add", (2, 3), (3, 2));
        assert_eq!(
            err.to_string(),
            "dimension mismatch in add: expected 2x3, got 3x2"
        );
    }

    #[test]
    fn test_error_categories() {
        let dim = LinsysError::dimension("set_row", 3, 2);
        let idx = LinsysError::Index {
            x: 0,
            y: 9,
            width: 1,
            height: 1,
        };
        let parse = LinsysError::Parse {
            line: 2,
            message: "expected 3 values".into(),
        };

        assert!(dim.is_dimension_error());
        assert!(!dim.is_index_error());
        assert!(idx.is_index_error());
        assert!(!idx.is_input_error());
        assert!(parse.is_input_error());
        assert!(!parse.is_dimension_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LinsysError = io.into();
        assert!(err.is_input_error());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
