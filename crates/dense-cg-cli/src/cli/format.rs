//! Output formatting utilities

use colored::*;
use dense_cg::types::{DenseMatrix, SolverResult};

/// Scientific notation in C `printf("%.Ne")` style: `5.00e+00`, `-1.25e-03`.
pub fn sci(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// One line of `%.2e` entries, each followed by a space.
pub fn format_vector(v: &[f64]) -> String {
    v.iter().map(|&x| format!("{} ", sci(x, 2))).collect()
}

/// A matrix as one [`format_vector`] line per row.
pub fn format_matrix(matrix: &DenseMatrix) -> String {
    matrix
        .rows
        .iter()
        .map(|row| format_vector(row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-iteration progress line.
pub fn format_iteration(iteration: usize, residual_sq: f64) -> String {
    format!("{iteration}\tError: {}", sci(residual_sq, 5))
}

/// Section heading such as `A =`.
pub fn format_heading(label: &str) -> String {
    format!("\n{}", label.bold())
}

/// Closing summary of a solve.
pub fn format_summary(result: &SolverResult) -> String {
    let status = if result.converged {
        "converged".green().bold()
    } else {
        "iteration cap reached".yellow().bold()
    };
    format!(
        "{} after {} iterations (r.r = {}, {:.2?})",
        status,
        result.iterations.to_string().cyan(),
        sci(result.residual_sq, 5),
        result.wall_time,
    )
}

/// Format error message
pub fn format_error(msg: &str) -> String {
    format!("{} {}", "Error:".red().bold(), msg)
}
