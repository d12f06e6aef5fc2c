//! Solver configuration.
//!
//! [`CgConfig`] carries the stopping rules of the CG iteration. It derives
//! `Deserialize` with `#[serde(default)]`, so a problem file may specify any
//! subset of the fields:
//!
//! ```
//! use dense_cg::config::CgConfig;
//!
//! let cfg: CgConfig = serde_json::from_str(r#"{ "max_iterations": 200 }"#).unwrap();
//! assert_eq!(cfg.max_iterations, 200);
//! assert_eq!(cfg.tolerance, 1e-30);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Default convergence threshold on the squared residual norm `r . r`.
pub const DEFAULT_TOLERANCE: f64 = 1e-30;

/// Default absolute tolerance used by the optional symmetry check.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Configuration for [`ConjugateGradientSolver`](crate::cg::ConjugateGradientSolver).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CgConfig {
    /// Upper bound on CG iterations.
    pub max_iterations: usize,

    /// Convergence threshold on the squared residual norm: the solve stops
    /// once `r . r < tolerance`.
    pub tolerance: f64,

    /// Verify `A == A^T` before iterating.
    pub check_symmetry: bool,

    /// Absolute tolerance for the symmetry check.
    pub symmetry_tolerance: f64,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            check_symmetry: false,
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
        }
    }
}

impl CgConfig {
    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the squared-residual convergence threshold.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable the symmetry pre-check.
    pub fn with_symmetry_check(mut self, enabled: bool) -> Self {
        self.check_symmetry = enabled;
        self
    }

    /// Check that every parameter is inside its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ParameterOutOfRange`] for a zero iteration
    /// cap or a tolerance that is not positive and finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_iterations == 0 {
            return Err(ValidationError::ParameterOutOfRange {
                name: "max_iterations".into(),
                value: "0".into(),
                expected: ">= 1".into(),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ValidationError::ParameterOutOfRange {
                name: "tolerance".into(),
                value: self.tolerance.to_string(),
                expected: "positive finite value".into(),
            });
        }

        if self.check_symmetry
            && (!self.symmetry_tolerance.is_finite() || self.symmetry_tolerance < 0.0)
        {
            return Err(ValidationError::ParameterOutOfRange {
                name: "symmetry_tolerance".into(),
                value: self.symmetry_tolerance.to_string(),
                expected: "non-negative finite value".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = CgConfig::default();
        assert_eq!(cfg.max_iterations, 50);
        assert_eq!(cfg.tolerance, 1e-30);
        assert!(!cfg.check_symmetry);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = CgConfig::default()
            .with_max_iterations(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ParameterOutOfRange { ref name, .. } if name == "max_iterations"
        ));
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tol in [0.0, -1e-8, f64::NAN, f64::INFINITY] {
            let err = CgConfig::default().with_tolerance(tol).validate().unwrap_err();
            assert!(
                matches!(err, ValidationError::ParameterOutOfRange { ref name, .. } if name == "tolerance"),
                "tol={tol}: {err:?}"
            );
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: CgConfig =
            serde_json::from_str(r#"{ "tolerance": 1e-20, "check_symmetry": true }"#).unwrap();
        assert_eq!(cfg.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(cfg.tolerance, 1e-20);
        assert!(cfg.check_symmetry);
        assert_eq!(cfg.symmetry_tolerance, DEFAULT_SYMMETRY_TOLERANCE);
    }
}
