//! Conjugate Gradient solver for dense symmetric positive-definite systems.
//!
//! Solves `Ax = b` where `A` is a symmetric positive-definite (SPD) dense
//! matrix. Every vector operation goes through [`VectorOps`], so all dot and
//! matrix-vector products are GEMM calls on the configured kernel.
//!
//! # Algorithm
//!
//! Unpreconditioned CG with Fletcher-Reeves direction updates, convergence
//! measured on the squared residual `rho = r . r`:
//!
//! ```text
//! x = 0
//! r = b - A*x
//! p = r
//! rho = r . r
//!
//! for k in 0..max_iterations:
//!     if k > 0:
//!         beta = rho / rho_prev
//!         p    = r + beta * p
//!     q     = A * p
//!     alpha = rho / (p . q)
//!     x     = x + alpha * p
//!     r     = r - alpha * q
//!     emit (k, rho)
//!     rho_prev = rho
//!     rho      = r . r
//!     if rho < tolerance:
//!         converged; break
//! ```
//!
//! The defaults (50 iterations, `rho < 1e-30`) come from [`CgConfig`].
//!
//! # Breakdown
//!
//! For an SPD matrix `p . q = p^T A p > 0` whenever `p != 0`, and `p == 0`
//! only once the residual is already zero. A curvature `p . q` that is not
//! strictly positive and finite therefore means the matrix is not SPD (or the
//! recurrence has overflowed); the solve stops with
//! [`SolverError::NumericalInstability`] instead of dividing by it.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::config::CgConfig;
use crate::error::SolverError;
use crate::events::{NoopObserver, SolverEvent, SolverObserver};
use crate::kernel::{GemmKernel, NdarrayGemm};
use crate::traits::LinearSolver;
use crate::types::{Algorithm, ConvergenceInfo, DenseMatrix, SolverResult};
use crate::validation::{validate_symmetric, validate_system};
use crate::vector::VectorOps;

/// Solve `A x = b` with the default configuration and kernel, returning only
/// `x`.
///
/// Use [`ConjugateGradientSolver`] directly to change the iteration cap or
/// tolerance, or to learn whether the solve converged.
///
/// # Errors
///
/// See [`ConjugateGradientSolver::solve_observed`].
///
/// # Example
///
/// ```
/// use dense_cg::types::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(vec![vec![4.0, 1.0], vec![1.0, 3.0]]);
/// let x = dense_cg::solve(&a, &[1.0, 2.0]).unwrap();
/// assert!((4.0 * x[0] + x[1] - 1.0).abs() < 1e-12);
/// assert!((x[0] + 3.0 * x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve(matrix: &DenseMatrix, rhs: &[f64]) -> Result<Vec<f64>, SolverError> {
    ConjugateGradientSolver::new(CgConfig::default())
        .solve_observed(matrix, rhs, &mut NoopObserver)
        .map(|result| result.solution)
}

// ═══════════════════════════════════════════════════════════════════════════
// ConjugateGradientSolver
// ═══════════════════════════════════════════════════════════════════════════

/// Conjugate Gradient solver for symmetric positive-definite dense systems.
///
/// Stores the solver configuration and the GEMM kernel. The solve itself is
/// stateless and may be invoked concurrently on different inputs from
/// multiple threads.
#[derive(Debug, Clone)]
pub struct ConjugateGradientSolver<K = NdarrayGemm> {
    config: CgConfig,
    ops: VectorOps<K>,
}

impl ConjugateGradientSolver<NdarrayGemm> {
    /// Create a solver on the default `ndarray` kernel.
    pub fn new(config: CgConfig) -> Self {
        Self::with_kernel(config, NdarrayGemm)
    }
}

impl Default for ConjugateGradientSolver<NdarrayGemm> {
    fn default() -> Self {
        Self::new(CgConfig::default())
    }
}

impl<K: GemmKernel> ConjugateGradientSolver<K> {
    /// Create a solver on a specific GEMM kernel.
    pub fn with_kernel(config: CgConfig, kernel: K) -> Self {
        Self {
            config,
            ops: VectorOps::new(kernel),
        }
    }

    /// Return the configuration.
    #[inline]
    pub fn config(&self) -> &CgConfig {
        &self.config
    }

    /// Return the configured tolerance.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    /// Return the configured maximum iterations.
    #[inline]
    pub fn max_iterations(&self) -> usize {
        self.config.max_iterations
    }

    /// Solve `A x = b`, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// * [`SolverError::InvalidInput`] -- shape mismatch, non-finite input,
    ///   bad configuration, or (with `check_symmetry`) an asymmetric matrix.
    ///   Raised before the first iteration; no events are emitted.
    /// * [`SolverError::NumericalInstability`] -- non-positive or non-finite
    ///   `p . Ap`.
    pub fn solve_observed<O>(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        observer: &mut O,
    ) -> Result<SolverResult, SolverError>
    where
        O: SolverObserver + ?Sized,
    {
        self.validate(matrix, rhs)?;
        self.solve_inner(matrix, rhs, observer)
    }

    // -------------------------------------------------------------------
    // Input validation
    // -------------------------------------------------------------------

    fn validate(&self, matrix: &DenseMatrix, rhs: &[f64]) -> Result<(), SolverError> {
        self.config.validate()?;
        validate_system(matrix, rhs)?;
        if self.config.check_symmetry {
            validate_symmetric(matrix, self.config.symmetry_tolerance)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Core CG algorithm
    // -------------------------------------------------------------------

    fn solve_inner<O>(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        observer: &mut O,
    ) -> Result<SolverResult, SolverError>
    where
        O: SolverObserver + ?Sized,
    {
        let start_time = Instant::now();
        let ops = &self.ops;
        let n = matrix.nrows();
        let tolerance = self.config.tolerance;
        let max_iterations = self.config.max_iterations;

        observer.on_event(&SolverEvent::SolveRequested {
            algorithm: Algorithm::CG,
            dimension: n,
            max_iterations,
            tolerance,
        });

        debug!(
            "CG: n={}, tol={:.2e}, max_iter={}, kernel={}",
            n,
            tolerance,
            max_iterations,
            ops.adapter().kernel().name(),
        );

        // --- x = 0, r = b - A*x, p = r ---
        let mut x = vec![0.0f64; n];
        let mut r = ops.sub(rhs, &ops.apply(matrix, &x)?)?;
        let mut p = r.clone();
        let mut rho = ops.norm_sq(&r)?;
        let mut rho_prev = rho;

        let mut history = Vec::with_capacity(max_iterations.min(256));

        if rho < tolerance {
            debug!("CG: initial residual {rho:.6e} already below tolerance");
            return Ok(self.finish(x, rho, true, start_time, history, observer));
        }

        let mut converged = false;

        for k in 0..max_iterations {
            // --- p = r + beta * p ---
            if k > 0 {
                let beta = rho / rho_prev;
                p = ops.axpy(beta, &p, &r)?;
            }

            // --- q = A * p ---
            let q = ops.apply(matrix, &p)?;

            // --- alpha = rho / (p . q) ---
            let p_dot_q = ops.dot(&p, &q)?;
            if !p_dot_q.is_finite() || p_dot_q <= 0.0 {
                warn!("CG: non-positive p.Ap = {p_dot_q:.4e} at iteration {k}");
                return Err(SolverError::NumericalInstability {
                    iteration: k,
                    detail: format!("p.Ap = {p_dot_q:.6e} is not positive; matrix may not be SPD"),
                });
            }
            let alpha = rho / p_dot_q;

            // --- x = x + alpha * p, r = r - alpha * q ---
            x = ops.axpy(alpha, &p, &x)?;
            r = ops.axpy(-alpha, &q, &r)?;

            history.push(ConvergenceInfo {
                iteration: k,
                residual_sq: rho,
            });
            observer.on_event(&SolverEvent::IterationCompleted {
                iteration: k,
                residual_sq: rho,
            });
            trace!("CG iter {k}: r.r = {rho:.6e}, alpha = {alpha:.6e}");

            // --- rho = r . r ---
            rho_prev = rho;
            rho = ops.norm_sq(&r)?;

            if rho < tolerance {
                converged = true;
                debug!("CG converged at iteration {k}: r.r = {rho:.6e}");
                break;
            }
        }

        if !converged {
            warn!(
                "CG: iteration cap {} reached, r.r = {rho:.6e} (tol {tolerance:.2e})",
                max_iterations,
            );
        }

        Ok(self.finish(x, rho, converged, start_time, history, observer))
    }

    fn finish<O>(
        &self,
        solution: Vec<f64>,
        residual_sq: f64,
        converged: bool,
        start_time: Instant,
        convergence_history: Vec<ConvergenceInfo>,
        observer: &mut O,
    ) -> SolverResult
    where
        O: SolverObserver + ?Sized,
    {
        let wall_time = start_time.elapsed();
        let iterations = convergence_history.len();

        let event = if converged {
            SolverEvent::SolveConverged {
                iterations,
                residual_sq,
                wall_time,
            }
        } else {
            SolverEvent::IterationCapReached {
                iterations,
                residual_sq,
                wall_time,
            }
        };
        observer.on_event(&event);

        SolverResult {
            solution,
            iterations,
            residual_sq,
            converged,
            wall_time,
            convergence_history,
            algorithm: Algorithm::CG,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LinearSolver trait implementation
// ═══════════════════════════════════════════════════════════════════════════

impl<K: GemmKernel> LinearSolver for ConjugateGradientSolver<K> {
    fn solve(&self, matrix: &DenseMatrix, rhs: &[f64]) -> Result<SolverResult, SolverError> {
        self.solve_observed(matrix, rhs, &mut NoopObserver)
    }

    fn solve_with_observer(
        &self,
        matrix: &DenseMatrix,
        rhs: &[f64],
        observer: &mut dyn SolverObserver,
    ) -> Result<SolverResult, SolverError> {
        self.solve_observed(matrix, rhs, observer)
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::CG
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
