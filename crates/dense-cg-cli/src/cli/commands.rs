//! Command implementations

use anyhow::{Context, Result};
use dense_cg::cg::ConjugateGradientSolver;
use dense_cg::events::SolverEvent;
use dense_cg::kernel::{GemmKernel, GemmOp, Layout, NdarrayGemm, Transpose};
use std::path::Path;
use tracing::debug;

use crate::cli::format::{
    format_heading, format_iteration, format_matrix, format_summary, format_vector,
};
use crate::problem::Problem;

/// Options of the `solve` subcommand.
#[derive(Debug, Default)]
pub struct SolveOptions<'a> {
    pub problem: Option<&'a Path>,
    pub max_iterations: Option<usize>,
    pub tolerance: Option<f64>,
    pub check_symmetry: bool,
    pub events_json: bool,
}

/// Solve a problem and print the system, progress and solution.
pub fn solve_problem(opts: &SolveOptions<'_>) -> Result<()> {
    let mut problem = Problem::load_or_demo(opts.problem)?;
    problem.override_solver(opts.max_iterations, opts.tolerance, opts.check_symmetry);
    debug!(
        dimension = problem.matrix.nrows(),
        max_iterations = problem.solver.max_iterations,
        "problem loaded"
    );

    let solver = ConjugateGradientSolver::new(problem.solver);

    if opts.events_json {
        let mut events = Vec::new();
        let outcome = solver.solve_observed(&problem.matrix, &problem.rhs, &mut |e: &SolverEvent| {
            events.push(e.clone())
        });
        for event in &events {
            println!(
                "{}",
                serde_json::to_string(event).context("Failed to serialize solver event")?
            );
        }
        outcome.context("CG solve failed")?;
        return Ok(());
    }

    println!("{}", format_heading("A ="));
    println!("{}", format_matrix(&problem.matrix));
    println!("{}", format_heading("b ="));
    println!("{}", format_vector(&problem.rhs));
    println!("{}", format_heading(" Ax = b"));
    println!("CG solver start");

    let result = solver
        .solve_observed(&problem.matrix, &problem.rhs, &mut |e: &SolverEvent| {
            if let SolverEvent::IterationCompleted {
                iteration,
                residual_sq,
            } = e
            {
                println!("{}", format_iteration(*iteration, *residual_sq));
            }
        })
        .context("CG solve failed")?;

    println!("{}", format_heading("x ="));
    println!("{}", format_vector(&result.solution));
    println!("\n{}", format_summary(&result));

    Ok(())
}

/// Column-major `C = A * B^T + 2 C` on 3x2 operands, `C` starting at 0.5.
pub fn gemm_smoke_test(kernel: &dyn GemmKernel) -> Result<Vec<f64>> {
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
    kernel
        .gemm(&op, &data, &data, &mut c)
        .with_context(|| format!("{} GEMM smoke test failed", kernel.name()))?;
    Ok(c)
}

/// Run the GEMM smoke test on the default kernel and print `C`.
pub fn gemm_check() -> Result<()> {
    let c = gemm_smoke_test(&NdarrayGemm)?;
    let line: String = c.iter().map(|v| format!("{v:.6} ")).collect();
    println!("{line}");
    Ok(())
}
