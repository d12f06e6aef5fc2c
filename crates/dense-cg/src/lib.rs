//! Dense Conjugate Gradient solver on top of a GEMM kernel.
//!
//! This crate solves `Ax = b` for a dense symmetric positive-definite matrix
//! `A` with the Conjugate Gradient method. All dot and matrix-vector products
//! are expressed as calls to one general matrix-multiply primitive.
//!
//! # Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Kernel adapter | [`kernel`] | `dot` / `mat_vec` as GEMM calls; [`GemmKernel`](kernel::GemmKernel) seam |
//! | Vector arithmetic | [`vector`] | `add`, `sub`, `scale`, `dot`, `apply` |
//! | Solver | [`cg`] | the CG recurrence, events, results |
//!
//! # Example
//!
//! ```rust
//! use dense_cg::cg::ConjugateGradientSolver;
//! use dense_cg::config::CgConfig;
//! use dense_cg::traits::LinearSolver;
//! use dense_cg::types::DenseMatrix;
//!
//! // 3x3 SPD tridiagonal matrix
//! let matrix = DenseMatrix::tridiagonal(3, 4.0, -1.0);
//! let rhs = vec![3.0, 2.0, 3.0];
//!
//! let solver = ConjugateGradientSolver::new(CgConfig::default());
//! let result = solver.solve(&matrix, &rhs).unwrap();
//! assert!(result.converged);
//! for xi in &result.solution {
//!     assert!((xi - 1.0).abs() < 1e-12);
//! }
//! ```

pub mod cg;
pub mod config;
pub mod error;
pub mod events;
pub mod kernel;
pub mod traits;
pub mod types;
pub mod validation;
pub mod vector;

pub use cg::solve;
