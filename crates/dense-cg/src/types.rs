//! Core types for dense linear solvers.
//!
//! Provides [`DenseMatrix`] for row-major dense storage and result types for
//! solver convergence tracking.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DenseMatrix
// ---------------------------------------------------------------------------

/// Dense matrix stored as an ordered sequence of rows.
///
/// Rows are kept exactly as supplied: construction does not reject ragged
/// input, so that the shape checks in [`kernel`](crate::kernel) and the
/// solver are what report a malformed matrix. Serialises as a plain nested
/// array (`[[1.0, 2.0], [3.0, 4.0]]`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenseMatrix {
    /// Row data, one `Vec` per row.
    pub rows: Vec<Vec<f64>>,
}

impl DenseMatrix {
    /// Wrap the given rows without validation.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Build a square identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&vec![1.0; n])
    }

    /// Build a square diagonal matrix from the given diagonal entries.
    pub fn from_diagonal(diag: &[f64]) -> Self {
        let n = diag.len();
        let rows = diag
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let mut row = vec![0.0; n];
                row[i] = d;
                row
            })
            .collect();
        Self { rows }
    }

    /// Build a symmetric tridiagonal matrix with constant diagonal and
    /// off-diagonal values.
    pub fn tridiagonal(n: usize, diag: f64, off_diag: f64) -> Self {
        let rows = (0..n)
            .map(|i| {
                let mut row = vec![0.0; n];
                row[i] = diag;
                if i > 0 {
                    row[i - 1] = off_diag;
                }
                if i + 1 < n {
                    row[i + 1] = off_diag;
                }
                row
            })
            .collect();
        Self { rows }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the first row (`0` for an empty matrix).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Borrow row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// `true` if every row has the same length as the first one.
    pub fn is_rectangular(&self) -> bool {
        let cols = self.ncols();
        self.rows.iter().all(|r| r.len() == cols)
    }

    /// `true` if the matrix is rectangular with as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.is_rectangular() && self.nrows() == self.ncols()
    }

    /// Transpose: produces `A^T`.
    ///
    /// Ragged rows are treated as zero-padded to the widest row.
    pub fn transpose(&self) -> DenseMatrix {
        let cols = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..cols)
            .map(|j| {
                self.rows
                    .iter()
                    .map(|r| r.get(j).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();
        DenseMatrix { rows }
    }

    /// Flatten into contiguous row-major storage.
    pub fn to_row_major(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }
}

impl From<Vec<Vec<f64>>> for DenseMatrix {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        Self::from_rows(rows)
    }
}

// ---------------------------------------------------------------------------
// Solver result types
// ---------------------------------------------------------------------------

/// Algorithm identifier attached to results and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Unpreconditioned Conjugate Gradient.
    ///
    /// Optimal for symmetric positive-definite systems. Converges in at most
    /// `n` steps in exact arithmetic; practical convergence depends on the
    /// condition number.
    CG,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::CG => write!(f, "cg"),
        }
    }
}

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Iteration index (0-based).
    pub iteration: usize,
    /// Squared residual norm `r . r` this iteration started from.
    pub residual_sq: f64,
}

/// Result returned by a solver invocation that ran to completion.
///
/// Hitting the iteration cap still produces a result; check
/// [`converged`](Self::converged).
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Solution vector x.
    pub solution: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Final squared residual norm `r . r`.
    pub residual_sq: f64,
    /// `true` if the residual dropped below the tolerance, `false` if the
    /// iteration cap was reached first.
    pub converged: bool,
    /// Wall-clock time taken.
    pub wall_time: Duration,
    /// Per-iteration convergence history.
    pub convergence_history: Vec<ConvergenceInfo>,
    /// Algorithm used.
    pub algorithm: Algorithm,
}

impl SolverResult {
    /// Final residual L2 norm, `sqrt(residual_sq)`.
    #[inline]
    pub fn residual_norm(&self) -> f64 {
        self.residual_sq.sqrt()
    }
}
