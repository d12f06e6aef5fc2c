//! Diagnostic event stream for solver operations.
//!
//! A solve emits [`SolverEvent`]s to a [`SolverObserver`]: what was
//! requested, the squared residual of every iteration, and how the solve
//! ended. Any `FnMut(&SolverEvent)` closure is an observer, so collecting
//! events is a one-liner:
//!
//! ```
//! use dense_cg::cg::ConjugateGradientSolver;
//! use dense_cg::events::SolverEvent;
//! use dense_cg::types::DenseMatrix;
//!
//! let solver = ConjugateGradientSolver::default();
//! let mut events = Vec::new();
//! solver
//!     .solve_observed(&DenseMatrix::identity(2), &[1.0, 2.0], &mut |e: &SolverEvent| {
//!         events.push(e.clone())
//!     })
//!     .unwrap();
//! assert!(matches!(events.first(), Some(SolverEvent::SolveRequested { .. })));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Algorithm;

/// Events emitted during a solver invocation.
///
/// Events are tagged with `#[serde(tag = "type")]` so they serialise as
/// `{ "type": "IterationCompleted", ... }` for easy ingestion as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolverEvent {
    /// A solve request passed validation and is about to begin.
    SolveRequested {
        /// Algorithm that will run.
        algorithm: Algorithm,
        /// System dimension `n`.
        dimension: usize,
        /// Iteration cap in effect.
        max_iterations: usize,
        /// Squared-residual threshold in effect.
        tolerance: f64,
    },

    /// One iteration of the solver completed.
    IterationCompleted {
        /// Iteration number (0-indexed).
        iteration: usize,
        /// Squared residual norm the iteration started from.
        residual_sq: f64,
    },

    /// The squared residual dropped below the tolerance.
    SolveConverged {
        /// Total iterations executed.
        iterations: usize,
        /// Final squared residual norm.
        residual_sq: f64,
        /// Total wall time.
        wall_time: Duration,
    },

    /// The iteration cap was reached before convergence.
    IterationCapReached {
        /// Total iterations executed (equal to the cap).
        iterations: usize,
        /// Final squared residual norm.
        residual_sq: f64,
        /// Total wall time.
        wall_time: Duration,
    },
}

/// Receiver of [`SolverEvent`]s.
pub trait SolverObserver {
    /// Handle one event.
    fn on_event(&mut self, event: &SolverEvent);
}

impl<F: FnMut(&SolverEvent)> SolverObserver for F {
    fn on_event(&mut self, event: &SolverEvent) {
        self(event)
    }
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SolverObserver for NoopObserver {
    fn on_event(&mut self, _event: &SolverEvent) {}
}
