//! Shared test helpers for the dense-cg integration test suite.
//!
//! Provides deterministic random matrix generators, a dense reference
//! solver, and floating-point comparison utilities used across all test
//! modules.

#![allow(dead_code)]

use dense_cg::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
///
/// Uses the Knuth MMIX LCG parameters. Not cryptographically secure, but
/// perfectly adequate for generating reproducible test matrices.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

// ---------------------------------------------------------------------------
// Matrix generators
// ---------------------------------------------------------------------------

/// The 10x10 demo system: 5.0 on the diagonal, 2.0 on both first
/// off-diagonals.
pub fn demo_matrix() -> DenseMatrix {
    DenseMatrix::tridiagonal(10, 5.0, 2.0)
}

/// Right-hand side paired with [`demo_matrix`].
pub fn demo_rhs() -> Vec<f64> {
    vec![3.0, 1.0, 4.0, 0.0, 5.0, -1.0, 6.0, -2.0, 7.0, -15.0]
}

/// Generate a random symmetric, strictly diagonally dominant matrix with a
/// positive diagonal (hence SPD).
///
/// Each upper-triangle entry is non-zero with probability `density`; the
/// diagonal is `1 + rand + sum_j |a_ij|`.
pub fn random_spd(n: usize, density: f64, seed: u64) -> DenseMatrix {
    let mut rng = Lcg::new(seed);
    let mut rows = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.next_f64() < density {
                let val = rng.next_f64_range(-1.0, 1.0);
                rows[i][j] = val;
                rows[j][i] = val;
            }
        }
    }

    for i in 0..n {
        let off_diag: f64 = (0..n).filter(|&j| j != i).map(|j| rows[i][j].abs()).sum();
        rows[i][i] = off_diag + 1.0 + rng.next_f64();
    }

    DenseMatrix::from_rows(rows)
}

/// Generate a random dense (not symmetric) matrix with entries in [-1, 1).
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> DenseMatrix {
    let mut rng = Lcg::new(seed);
    DenseMatrix::from_rows(
        (0..rows)
            .map(|_| (0..cols).map(|_| rng.next_f64_range(-1.0, 1.0)).collect())
            .collect(),
    )
}

/// Generate a deterministic random vector of length `n`.
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Dense reference solver
// ---------------------------------------------------------------------------

/// Solve `Ax = b` using dense Gaussian elimination with partial pivoting.
///
/// This is an O(n^3) reference solver used only for small test problems
/// to verify iterative solver accuracy.
///
/// # Panics
///
/// Panics if the matrix is singular or dimensions are inconsistent.
pub fn dense_solve(matrix: &DenseMatrix, rhs: &[f64]) -> Vec<f64> {
    let n = matrix.nrows();
    assert!(matrix.is_square(), "dense_solve requires a square matrix");
    assert_eq!(rhs.len(), n, "rhs length must match matrix dimension");

    // Augmented matrix [A | b].
    let mut aug: Vec<Vec<f64>> = matrix
        .rows
        .iter()
        .zip(rhs)
        .map(|(row, &b)| {
            let mut r = row.clone();
            r.push(b);
            r
        })
        .collect();

    // Forward elimination with partial pivoting.
    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col][col].abs();
        for row in (col + 1)..n {
            if aug[row][col].abs() > max_val {
                max_val = aug[row][col].abs();
                max_row = row;
            }
        }
        assert!(max_val > 1e-15, "matrix is singular or near-singular");
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        for row in (col + 1)..n {
            let factor = aug[row][col] / pivot;
            for j in col..=n {
                aug[row][j] -= factor * aug[col][j];
            }
        }
    }

    // Back substitution.
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * x[j];
        }
        x[i] = sum / aug[i][i];
    }

    x
}

// ---------------------------------------------------------------------------
// Floating-point comparison utilities
// ---------------------------------------------------------------------------

/// Plain-loop `A x`, independent of any GEMM kernel.
pub fn reference_mat_vec(matrix: &DenseMatrix, x: &[f64]) -> Vec<f64> {
    matrix
        .rows
        .iter()
        .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
        .collect()
}

/// Compute the residual `b - A*x`.
pub fn compute_residual(matrix: &DenseMatrix, x: &[f64], rhs: &[f64]) -> Vec<f64> {
    reference_mat_vec(matrix, x)
        .iter()
        .zip(rhs)
        .map(|(ax, b)| b - ax)
        .collect()
}

/// Compute the L2 norm of a vector.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

/// Compute the L2 distance between two vectors.
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        .sqrt()
}

/// Compute the relative error ||approx - exact|| / ||exact||.
///
/// Returns absolute error if the exact solution has zero norm.
pub fn relative_error(approx: &[f64], exact: &[f64]) -> f64 {
    let exact_norm = l2_norm(exact);
    let error = l2_distance(approx, exact);
    if exact_norm > 1e-15 {
        error / exact_norm
    } else {
        error
    }
}
