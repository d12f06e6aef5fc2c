//! Error types for the solver crate.
//!
//! Shape problems, non-finite inputs and bad parameters are reported as
//! [`ValidationError`] before any arithmetic runs. Breakdown of the CG
//! recurrence surfaces as [`SolverError::NumericalInstability`]. Running out
//! of iterations is not an error; see
//! [`SolverResult::converged`](crate::types::SolverResult::converged).

/// Primary error type for solver operations.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// A numerical breakdown was detected (non-positive or non-finite
    /// curvature `p . Ap`).
    #[error("numerical instability at iteration {iteration}: {detail}")]
    NumericalInstability {
        /// Iteration at which the instability was detected.
        iteration: usize,
        /// Human-readable explanation.
        detail: String,
    },

    /// The caller supplied invalid input (dimensions, parameters, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Validation errors for kernel, vector and solver inputs.
///
/// These are raised eagerly before any computation begins so that callers get
/// clear diagnostics rather than mysterious numerical failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Operand lengths or matrix dimensions are inconsistent.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A value is NaN or infinite where a finite number is required.
    #[error("non-finite value detected: {0}")]
    NonFiniteValue(String),

    /// The matrix failed the optional symmetry check.
    #[error("matrix is not symmetric: |a[{row}][{col}] - a[{col}][{row}]| = {delta:.3e}")]
    NotSymmetric {
        /// Row of the first offending entry.
        row: usize,
        /// Column of the first offending entry.
        col: usize,
        /// Absolute difference between the mirrored entries.
        delta: f64,
    },

    /// A parameter is outside its valid range.
    #[error("parameter out of range: {name} = {value} (expected {expected})")]
    ParameterOutOfRange {
        /// Name of the parameter.
        name: String,
        /// The invalid value (as a string for flexibility).
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },
}

impl ValidationError {
    /// Convenience constructor for [`ValidationError::ShapeMismatch`].
    pub(crate) fn shape(detail: impl Into<String>) -> Self {
        Self::ShapeMismatch(detail.into())
    }
}
