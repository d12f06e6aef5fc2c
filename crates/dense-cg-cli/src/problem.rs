//! Problem definitions for the CLI: the built-in demo system and JSON
//! problem files.

use anyhow::{Context, Result};
use dense_cg::config::CgConfig;
use dense_cg::types::DenseMatrix;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A linear system `A x = b` plus optional solver settings.
///
/// On disk:
///
/// ```json
/// { "matrix": [[4.0, 1.0], [1.0, 3.0]], "rhs": [1.0, 2.0], "solver": { "max_iterations": 100 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Coefficient matrix, one array per row.
    pub matrix: DenseMatrix,
    /// Right-hand side.
    pub rhs: Vec<f64>,
    /// Solver settings; missing fields take their defaults.
    #[serde(default)]
    pub solver: CgConfig,
}

impl Problem {
    /// The 10x10 tridiagonal demo system (5 on the diagonal, 2 next to it).
    pub fn demo() -> Self {
        Self {
            matrix: DenseMatrix::tridiagonal(10, 5.0, 2.0),
            rhs: vec![3.0, 1.0, 4.0, 0.0, 5.0, -1.0, 6.0, -2.0, 7.0, -15.0],
            solver: CgConfig::default(),
        }
    }

    /// Read a problem from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse problem file {}", path.display()))
    }

    /// Load from `path` if given, otherwise the demo system.
    pub fn load_or_demo(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::demo()),
        }
    }

    /// Apply command-line overrides on top of the file's solver section.
    pub fn override_solver(
        &mut self,
        max_iterations: Option<usize>,
        tolerance: Option<f64>,
        check_symmetry: bool,
    ) {
        if let Some(n) = max_iterations {
            self.solver.max_iterations = n;
        }
        if let Some(t) = tolerance {
            self.solver.tolerance = t;
        }
        if check_symmetry {
            self.solver.check_symmetry = true;
        }
    }
}
