//! Vector arithmetic on top of the kernel adapter.
//!
//! [`VectorOps`] gives the CG recurrence algebraic building blocks
//! (`add`, `sub`, `scale`, `dot`, `apply`). Every operation is pure: inputs
//! are borrowed, a fresh `Vec` is returned.
//!
//! Operands of `add` / `sub` must have equal length, the same contract as
//! [`KernelAdapter::dot`] and [`KernelAdapter::mat_vec`]. A shorter operand is
//! never zero-extended.

use crate::error::ValidationError;
use crate::kernel::{GemmKernel, KernelAdapter, NdarrayGemm};
use crate::types::DenseMatrix;

/// Algebraic operations over `f64` vectors, with products routed through a
/// GEMM kernel.
#[derive(Debug, Clone, Default)]
pub struct VectorOps<K = NdarrayGemm> {
    adapter: KernelAdapter<K>,
}

impl<K: GemmKernel> VectorOps<K> {
    /// Build the layer over the given kernel.
    pub fn new(kernel: K) -> Self {
        Self {
            adapter: KernelAdapter::new(kernel),
        }
    }

    /// The underlying kernel adapter.
    #[inline]
    pub fn adapter(&self) -> &KernelAdapter<K> {
        &self.adapter
    }

    /// Elementwise `a + b`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if the lengths differ.
    pub fn add(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, ValidationError> {
        same_len("add", a, b)?;
        Ok(a.iter().zip(b).map(|(&x, &y)| x + y).collect())
    }

    /// Elementwise `a - b`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if the lengths differ.
    pub fn sub(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, ValidationError> {
        same_len("sub", a, b)?;
        Ok(a.iter().zip(b).map(|(&x, &y)| x - y).collect())
    }

    /// `s * v`.
    pub fn scale(&self, s: f64, v: &[f64]) -> Vec<f64> {
        v.iter().map(|&x| s * x).collect()
    }

    /// `y + alpha * x`, composed from [`scale`](Self::scale) and
    /// [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if the lengths differ.
    pub fn axpy(&self, alpha: f64, x: &[f64], y: &[f64]) -> Result<Vec<f64>, ValidationError> {
        self.add(y, &self.scale(alpha, x))
    }

    /// Dot product `a . b` via the kernel.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if the lengths differ.
    #[inline]
    pub fn dot(&self, a: &[f64], b: &[f64]) -> Result<f64, ValidationError> {
        self.adapter.dot(a, b)
    }

    /// Squared L2 norm `v . v`.
    #[inline]
    pub fn norm_sq(&self, v: &[f64]) -> Result<f64, ValidationError> {
        self.adapter.dot(v, v)
    }

    /// Matrix-vector product `A v` via the kernel.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] on any dimension disagreement.
    #[inline]
    pub fn apply(&self, matrix: &DenseMatrix, v: &[f64]) -> Result<Vec<f64>, ValidationError> {
        self.adapter.mat_vec(matrix, v)
    }
}

fn same_len(op: &str, a: &[f64], b: &[f64]) -> Result<(), ValidationError> {
    if a.len() != b.len() {
        return Err(ValidationError::shape(format!(
            "{op}: lengths {} and {} differ",
            a.len(),
            b.len(),
        )));
    }
    Ok(())
}
