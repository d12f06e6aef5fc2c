//! Solver trait.
//!
//! Solver algorithms implement [`LinearSolver`]; callers that only need
//! "solve this system" can hold a `&dyn LinearSolver`.

use crate::error::SolverError;
use crate::events::SolverObserver;
use crate::types::{Algorithm, DenseMatrix, SolverResult};

/// Core trait that every dense solver algorithm implements.
pub trait LinearSolver: Send + Sync {
    /// Solve the linear system `A x = b`.
    ///
    /// # Arguments
    ///
    /// * `matrix` - the dense coefficient matrix.
    /// * `rhs` - the right-hand side vector `b`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] on invalid input or numerical breakdown.
    /// Exhausting the iteration cap is reported through
    /// [`SolverResult::converged`], not as an error.
    fn solve(&self, matrix: &DenseMatrix, rhs: &[f64]) -> Result<SolverResult, SolverError>;

    /// Like [`solve`](Self::solve), forwarding diagnostics to `observer`.
    ///
    /// # Errors
    ///
    /// Same as [`solve`](Self::solve).
    fn solve_with_observer(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        observer: &mut dyn SolverObserver,
    ) -> Result<SolverResult, SolverError>;

    /// Return the algorithm identifier for this solver.
    fn algorithm(&self) -> Algorithm;
}
