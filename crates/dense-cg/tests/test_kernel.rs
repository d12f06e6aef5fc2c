//! Integration tests for the GEMM kernels, the kernel adapter and the vector
//! arithmetic layer.

mod helpers;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use dense_cg::error::ValidationError;
use dense_cg::kernel::{GemmKernel, GemmOp, KernelAdapter, Layout, NaiveGemm, NdarrayGemm, Transpose};
use dense_cg::vector::VectorOps;

use helpers::{random_matrix, random_vector, reference_mat_vec};

// ---------------------------------------------------------------------------
// Raw GEMM
// ---------------------------------------------------------------------------

/// Column-major `C = A * B^T + 2 C` with 3x2 operands stored at ld 3.
fn col_major_rank2_update(kernel: &dyn GemmKernel) -> Vec<f64> {
    let data = [1.0, 2.0, 1.0, -3.0, 4.0, -1.0];
    let op = GemmOp {
        layout: Layout::ColMajor,
        trans_a: Transpose::NoTrans,
        trans_b: Transpose::Trans,
        m: 3,
        n: 3,
        k: 2,
        alpha: 1.0,
        lda: 3,
        ldb: 3,
        beta: 2.0,
        ldc: 3,
    };
    let mut c = vec![0.5; 9];
    kernel.gemm(&op, &data, &data, &mut c).unwrap();
    c
}

#[test]
fn test_gemm_col_major_trans_b() {
    let expected = [11.0, -9.0, 5.0, -9.0, 21.0, -1.0, 5.0, -1.0, 3.0];
    for kernel in [&NdarrayGemm as &dyn GemmKernel, &NaiveGemm] {
        let c = col_major_rank2_update(kernel);
        for (got, want) in c.iter().zip(&expected) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_gemm_row_major_random_kernels_agree() {
    let (m, n, k) = (7, 5, 9);
    let a = random_matrix(m, k, 11).to_row_major();
    let b = random_matrix(k, n, 12).to_row_major();
    let op = GemmOp::row_major(m, n, k);

    let mut fast = vec![0.0; m * n];
    let mut naive = vec![0.0; m * n];
    NdarrayGemm.gemm(&op, &a, &b, &mut fast).unwrap();
    NaiveGemm.gemm(&op, &a, &b, &mut naive).unwrap();

    for (x, y) in fast.iter().zip(&naive) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn test_gemm_rejects_short_buffer() {
    let op = GemmOp::row_major(2, 2, 2);
    let mut c = vec![0.0; 4];
    for kernel in [&NdarrayGemm as &dyn GemmKernel, &NaiveGemm] {
        let err = kernel
            .gemm(&op, &[1.0; 3], &[1.0; 4], &mut c)
            .unwrap_err();
        assert!(
            matches!(err, ValidationError::ShapeMismatch(_)),
            "{}: got {err:?}",
            kernel.name()
        );
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

#[test]
fn test_dot_is_commutative() {
    let adapter = KernelAdapter::<NdarrayGemm>::default();
    for seed in 0..5u64 {
        let a = random_vector(33, seed);
        let b = random_vector(33, seed + 100);
        let ab = adapter.dot(&a, &b).unwrap();
        let ba = adapter.dot(&b, &a).unwrap();
        assert_relative_eq!(ab, ba, epsilon = 1e-12);
    }
}

#[test]
fn test_dot_length_mismatch() {
    let adapter = KernelAdapter::<NdarrayGemm>::default();
    let err = adapter.dot(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(err, ValidationError::ShapeMismatch(_)));
}

#[test]
fn test_mat_vec_matches_reference() {
    let adapter = KernelAdapter::new(NdarrayGemm);
    let matrix = random_matrix(8, 8, 3);
    let x = random_vector(8, 4);

    let got = adapter.mat_vec(&matrix, &x).unwrap();
    let want = reference_mat_vec(&matrix, &x);
    assert_eq!(got.len(), 8);
    for (g, w) in got.iter().zip(&want) {
        assert_relative_eq!(*g, *w, epsilon = 1e-12);
    }
}

#[test]
fn test_mat_vec_adjoint_identity() {
    // (A b) . c == b . (A^T c); A is deliberately non-symmetric.
    let adapter = KernelAdapter::<NdarrayGemm>::default();
    let matrix = random_matrix(6, 6, 21);
    let b = random_vector(6, 22);
    let c = random_vector(6, 23);

    let lhs = adapter
        .dot(&adapter.mat_vec(&matrix, &b).unwrap(), &c)
        .unwrap();
    let rhs = adapter
        .dot(&b, &adapter.mat_vec(&matrix.transpose(), &c).unwrap())
        .unwrap();
    assert_relative_eq!(lhs, rhs, epsilon = 1e-12);
}

#[test]
fn test_mat_vec_wrong_vector_length() {
    let adapter = KernelAdapter::<NdarrayGemm>::default();
    let matrix = random_matrix(3, 3, 1);
    let err = adapter.mat_vec(&matrix, &[1.0, 2.0]).unwrap_err();
    assert!(matches!(err, ValidationError::ShapeMismatch(_)));
}

// ---------------------------------------------------------------------------
// Vector arithmetic
// ---------------------------------------------------------------------------

#[test]
fn test_vector_add_sub_roundtrip() {
    let ops = VectorOps::<NdarrayGemm>::default();
    let a = random_vector(17, 8);
    let b = random_vector(17, 9);

    let back = ops.sub(&ops.add(&a, &b).unwrap(), &b).unwrap();
    for (x, y) in back.iter().zip(&a) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-15);
    }
}

#[test]
fn test_vector_add_requires_equal_lengths() {
    let ops = VectorOps::<NdarrayGemm>::default();
    assert!(matches!(
        ops.add(&[1.0, 2.0], &[1.0]),
        Err(ValidationError::ShapeMismatch(_))
    ));
    assert!(matches!(
        ops.sub(&[1.0], &[1.0, 2.0]),
        Err(ValidationError::ShapeMismatch(_))
    ));
}

#[test]
fn test_vector_scale_and_norm() {
    let ops = VectorOps::new(NaiveGemm);
    let v = [3.0, -4.0];
    assert_eq!(ops.scale(2.0, &v), vec![6.0, -8.0]);
    assert_eq!(ops.scale(0.0, &v), vec![0.0, 0.0]);
    assert_relative_eq!(ops.norm_sq(&v).unwrap(), 25.0);
    assert!(ops.scale(5.0, &[]).is_empty());
}

#[test]
fn test_vector_apply_uses_adapter() {
    let ops = VectorOps::<NdarrayGemm>::default();
    let matrix = random_matrix(5, 5, 40);
    let v = random_vector(5, 41);
    assert_eq!(
        ops.apply(&matrix, &v).unwrap(),
        ops.adapter().mat_vec(&matrix, &v).unwrap()
    );
}
