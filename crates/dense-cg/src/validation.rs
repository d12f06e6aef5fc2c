//! Input validation for solver operations.
//!
//! All validation functions run eagerly before any computation begins, so a
//! malformed system is rejected without a single iteration being spent on
//! it. Every public function returns [`ValidationError`] on failure, which
//! converts into [`SolverError::InvalidInput`](crate::error::SolverError)
//! via `From`.

use crate::error::ValidationError;
use crate::types::DenseMatrix;

// ---------------------------------------------------------------------------
// Matrix validation
// ---------------------------------------------------------------------------

/// Validate that `matrix` is square and finite.
///
/// Checks, in order:
///
/// 1. Every row has as many entries as there are rows.
/// 2. No `NaN` or `Inf` values.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use dense_cg::types::DenseMatrix;
/// use dense_cg::validation::validate_square_matrix;
///
/// assert!(validate_square_matrix(&DenseMatrix::identity(3)).is_ok());
/// assert!(validate_square_matrix(&DenseMatrix::from_rows(vec![vec![1.0, 2.0]])).is_err());
/// ```
pub fn validate_square_matrix(matrix: &DenseMatrix) -> Result<(), ValidationError> {
    let n = matrix.nrows();

    // 1. Square, no ragged rows
    for (i, row) in matrix.rows.iter().enumerate() {
        if row.len() != n {
            return Err(ValidationError::shape(format!(
                "row {i} has length {} but the matrix has {n} rows",
                row.len(),
            )));
        }
    }

    // 2. Finiteness
    for (i, row) in matrix.rows.iter().enumerate() {
        if let Some((j, v)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NonFiniteValue(format!("matrix[{i}][{j}] = {v}")));
        }
    }

    Ok(())
}

/// Validate that `matrix` is symmetric within `tolerance`.
///
/// Runs [`validate_square_matrix`] first. Positive definiteness is not
/// checked here; the solver reports it indirectly through a non-positive
/// curvature `p . Ap`.
///
/// # Errors
///
/// Any error from [`validate_square_matrix`], then
/// [`ValidationError::NotSymmetric`] for the first entry pair (in row-major
/// order of the upper triangle) whose difference exceeds `tolerance`.
pub fn validate_symmetric(matrix: &DenseMatrix, tolerance: f64) -> Result<(), ValidationError> {
    validate_square_matrix(matrix)?;

    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = (matrix.rows[i][j] - matrix.rows[j][i]).abs();
            if delta > tolerance {
                return Err(ValidationError::NotSymmetric {
                    row: i,
                    col: j,
                    delta,
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RHS vector validation
// ---------------------------------------------------------------------------

/// Validate a right-hand-side vector for a linear solve.
///
/// Checks:
///
/// 1. `rhs.len() == expected_len` (dimension must match the matrix).
/// 2. No `NaN` or `Inf` entries.
/// 3. If all entries are zero, emits a [`tracing::warn`] (a zero RHS is
///    technically valid but often indicates a bug).
///
/// # Errors
///
/// Returns [`ValidationError`] on dimension mismatch or non-finite values.
pub fn validate_rhs(rhs: &[f64], expected_len: usize) -> Result<(), ValidationError> {
    // 1. Length check
    if rhs.len() != expected_len {
        return Err(ValidationError::shape(format!(
            "rhs length {} does not match matrix dimension {}",
            rhs.len(),
            expected_len,
        )));
    }

    // 2. Finiteness
    if let Some((i, v)) = rhs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!("rhs[{i}] = {v}")));
    }

    // 3. All-zero warning
    if !rhs.is_empty() && rhs.iter().all(|&v| v == 0.0) {
        tracing::warn!("rhs vector is all zeros; solution is trivially zero");
    }

    Ok(())
}

/// Validate a complete `A x = b` system: square finite matrix, matching
/// finite rhs.
///
/// # Errors
///
/// Returns the first [`ValidationError`] raised by
/// [`validate_square_matrix`] or [`validate_rhs`]. The rhs length is checked
/// against the row count before the matrix shape, so a wrong-length rhs is
/// reported as such even for a malformed matrix.
pub fn validate_system(matrix: &DenseMatrix, rhs: &[f64]) -> Result<(), ValidationError> {
    if rhs.len() != matrix.nrows() {
        return Err(ValidationError::shape(format!(
            "rhs length {} does not match matrix rows {}",
            rhs.len(),
            matrix.nrows(),
        )));
    }
    validate_square_matrix(matrix)?;
    validate_rhs(rhs, matrix.nrows())
}
