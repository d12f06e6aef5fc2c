//! GEMM kernel boundary and the dot / matrix-vector adapter built on it.
//!
//! Every vector and matrix product in the crate goes through one primitive,
//! the general matrix multiply
//!
//! ```text
//! C = alpha * op(A) * op(B) + beta * C
//! ```
//!
//! described by a [`GemmOp`] (extents `m`, `n`, `k`, leading dimensions,
//! storage [`Layout`] and per-operand [`Transpose`]). Implementations of
//! [`GemmKernel`] only have to provide that primitive:
//!
//! - [`NdarrayGemm`] wraps strided `ndarray` views around the caller's slices
//!   and calls [`ndarray::linalg::general_mat_mul`], which dispatches to the
//!   blocked `matrixmultiply` dgemm for larger shapes.
//! - [`NaiveGemm`] is a portable triple loop used as a reference.
//!
//! [`KernelAdapter`] translates vectors into that calling convention: a dot
//! product is a `1 x N` by `N x 1` product, a matrix-vector product is an
//! `N x N` by `N x 1` product over the row-major flattening of the matrix.

use ndarray::{linalg::general_mat_mul, ArrayView2, ArrayViewMut2, ShapeBuilder};

use crate::error::ValidationError;
use crate::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Calling convention
// ---------------------------------------------------------------------------

/// Storage order of the raw buffers handed to the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Element `(i, j)` lives at `i * ld + j`.
    RowMajor,
    /// Element `(i, j)` lives at `j * ld + i`.
    ColMajor,
}

/// Whether an operand is used as stored or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    /// `op(X) = X`.
    NoTrans,
    /// `op(X) = X^T`.
    Trans,
}

/// Full description of one GEMM call.
///
/// `op(A)` is `m x k`, `op(B)` is `k x n` and `C` is `m x n`. The leading
/// dimensions refer to the *stored* operands, BLAS style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmOp {
    /// Storage order shared by `A`, `B` and `C`.
    pub layout: Layout,
    /// Transposition applied to `A`.
    pub trans_a: Transpose,
    /// Transposition applied to `B`.
    pub trans_b: Transpose,
    /// Rows of `op(A)` and `C`.
    pub m: usize,
    /// Columns of `op(B)` and `C`.
    pub n: usize,
    /// Columns of `op(A)`, rows of `op(B)`.
    pub k: usize,
    /// Scalar applied to the product.
    pub alpha: f64,
    /// Leading dimension of stored `A`.
    pub lda: usize,
    /// Leading dimension of stored `B`.
    pub ldb: usize,
    /// Scalar applied to the existing contents of `C`.
    pub beta: f64,
    /// Leading dimension of `C`.
    pub ldc: usize,
}

impl GemmOp {
    /// Row-major, no-transpose `C = A * B` with tightly packed operands.
    pub fn row_major(m: usize, n: usize, k: usize) -> Self {
        Self {
            layout: Layout::RowMajor,
            trans_a: Transpose::NoTrans,
            trans_b: Transpose::NoTrans,
            m,
            n,
            k,
            alpha: 1.0,
            lda: k.max(1),
            ldb: n.max(1),
            beta: 0.0,
            ldc: n.max(1),
        }
    }

    /// Set the multiply / accumulate factors.
    pub fn with_scalars(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Check leading dimensions and buffer lengths against the extents.
    ///
    /// Kernels call this before touching memory so that a malformed call is
    /// reported instead of reading out of bounds.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ParameterOutOfRange`] for a leading dimension below
    /// the BLAS minimum, [`ValidationError::ShapeMismatch`] for a buffer too
    /// short to hold its operand.
    pub fn validate(&self, a_len: usize, b_len: usize, c_len: usize) -> Result<(), ValidationError> {
        let (a_rows, a_cols) = stored_dims(self.trans_a, self.m, self.k);
        let (b_rows, b_cols) = stored_dims(self.trans_b, self.k, self.n);

        check_operand(self.layout, "A", "lda", a_rows, a_cols, self.lda, a_len)?;
        check_operand(self.layout, "B", "ldb", b_rows, b_cols, self.ldb, b_len)?;
        check_operand(self.layout, "C", "ldc", self.m, self.n, self.ldc, c_len)?;
        Ok(())
    }

    /// Offset of `op(X)[row][col]` inside a stored operand.
    #[inline]
    fn offset(&self, trans: Transpose, ld: usize, row: usize, col: usize) -> usize {
        let (r, c) = match trans {
            Transpose::NoTrans => (row, col),
            Transpose::Trans => (col, row),
        };
        match self.layout {
            Layout::RowMajor => r * ld + c,
            Layout::ColMajor => c * ld + r,
        }
    }
}

/// Stored shape of an operand whose `op()` shape is `rows x cols`.
#[inline]
fn stored_dims(trans: Transpose, rows: usize, cols: usize) -> (usize, usize) {
    match trans {
        Transpose::NoTrans => (rows, cols),
        Transpose::Trans => (cols, rows),
    }
}

/// `(row_stride, col_stride)` of a stored operand.
#[inline]
fn stride_pair(layout: Layout, ld: usize) -> (usize, usize) {
    match layout {
        Layout::RowMajor => (ld, 1),
        Layout::ColMajor => (1, ld),
    }
}

fn check_operand(
    layout: Layout,
    operand: &str,
    ld_name: &str,
    rows: usize,
    cols: usize,
    ld: usize,
    len: usize,
) -> Result<(), ValidationError> {
    let (inner, outer) = match layout {
        Layout::RowMajor => (cols, rows),
        Layout::ColMajor => (rows, cols),
    };

    if ld < inner.max(1) {
        return Err(ValidationError::ParameterOutOfRange {
            name: ld_name.into(),
            value: ld.to_string(),
            expected: format!(">= {}", inner.max(1)),
        });
    }

    let required = if rows == 0 || cols == 0 {
        0
    } else {
        (outer - 1) * ld + inner
    };
    if len < required {
        return Err(ValidationError::shape(format!(
            "{operand} is {rows}x{cols} with leading dimension {ld} and needs {required} \
             elements, got {len}",
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Kernels
// ---------------------------------------------------------------------------

/// A dense general matrix-multiply primitive.
///
/// Implementations must be stateless with respect to individual calls; the
/// same kernel value is shared by every product of a solve.
pub trait GemmKernel: Send + Sync {
    /// Compute `C = alpha * op(A) * op(B) + beta * C`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the description in `op` does not fit
    /// the supplied buffers.
    fn gemm(&self, op: &GemmOp, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<(), ValidationError>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// GEMM backed by [`ndarray::linalg::general_mat_mul`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NdarrayGemm;

impl NdarrayGemm {
    fn operand_view<'a>(
        op: &GemmOp,
        trans: Transpose,
        rows: usize,
        cols: usize,
        ld: usize,
        data: &'a [f64],
    ) -> Result<ArrayView2<'a, f64>, ValidationError> {
        let (sr, sc) = stored_dims(trans, rows, cols);
        let view = ArrayView2::from_shape((sr, sc).strides(stride_pair(op.layout, ld)), data)
            .map_err(|e| ValidationError::shape(format!("cannot view {sr}x{sc} operand: {e}")))?;
        Ok(match trans {
            Transpose::NoTrans => view,
            Transpose::Trans => view.reversed_axes(),
        })
    }
}

impl GemmKernel for NdarrayGemm {
    fn gemm(&self, op: &GemmOp, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<(), ValidationError> {
        op.validate(a.len(), b.len(), c.len())?;

        let a_view = Self::operand_view(op, op.trans_a, op.m, op.k, op.lda, a)?;
        let b_view = Self::operand_view(op, op.trans_b, op.k, op.n, op.ldb, b)?;
        let mut c_view =
            ArrayViewMut2::from_shape((op.m, op.n).strides(stride_pair(op.layout, op.ldc)), c)
                .map_err(|e| ValidationError::shape(format!("cannot view output: {e}")))?;

        general_mat_mul(op.alpha, &a_view, &b_view, op.beta, &mut c_view);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ndarray"
    }
}

/// Portable scalar GEMM: a plain triple loop with no blocking.
///
/// Slow, but trivially correct; useful as a cross-check for other kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveGemm;

impl GemmKernel for NaiveGemm {
    fn gemm(&self, op: &GemmOp, a: &[f64], b: &[f64], c: &mut [f64]) -> Result<(), ValidationError> {
        op.validate(a.len(), b.len(), c.len())?;

        for i in 0..op.m {
            for j in 0..op.n {
                let mut sum = 0.0f64;
                for p in 0..op.k {
                    sum += a[op.offset(op.trans_a, op.lda, i, p)]
                        * b[op.offset(op.trans_b, op.ldb, p, j)];
                }
                let idx = op.offset(Transpose::NoTrans, op.ldc, i, j);
                c[idx] = if op.beta == 0.0 {
                    op.alpha * sum
                } else {
                    op.alpha * sum + op.beta * c[idx]
                };
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Dot and matrix-vector products expressed as GEMM calls.
#[derive(Debug, Clone, Default)]
pub struct KernelAdapter<K = NdarrayGemm> {
    kernel: K,
}

impl<K: GemmKernel> KernelAdapter<K> {
    /// Wrap a kernel.
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    /// The wrapped kernel.
    #[inline]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Dot product `a . b`, computed as `(1 x N) * (N x 1)`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if the lengths differ.
    pub fn dot(&self, a: &[f64], b: &[f64]) -> Result<f64, ValidationError> {
        if a.len() != b.len() {
            return Err(ValidationError::shape(format!(
                "dot: lengths {} and {} differ",
                a.len(),
                b.len(),
            )));
        }
        if a.is_empty() {
            return Ok(0.0);
        }

        let n = a.len();
        let mut c = [0.0f64; 1];
        self.kernel.gemm(&GemmOp::row_major(1, 1, n), a, b, &mut c)?;
        Ok(c[0])
    }

    /// Matrix-vector product `A x`, computed as `(N x N) * (N x 1)` over the
    /// row-major flattening of `A`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ShapeMismatch`] if `x.len()` differs from the row
    /// count or any row's length differs from `x.len()`.
    pub fn mat_vec(&self, matrix: &DenseMatrix, x: &[f64]) -> Result<Vec<f64>, ValidationError> {
        let n = x.len();
        if matrix.nrows() != n {
            return Err(ValidationError::shape(format!(
                "mat_vec: matrix has {} rows but vector has length {}",
                matrix.nrows(),
                n,
            )));
        }
        if let Some((i, row)) = matrix.rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(ValidationError::shape(format!(
                "mat_vec: row {i} has length {} (expected {n})",
                row.len(),
            )));
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let flat = matrix.to_row_major();
        let mut y = vec![0.0f64; n];
        self.kernel.gemm(&GemmOp::row_major(n, 1, n), &flat, x, &mut y)?;
        Ok(y)
    }
}
