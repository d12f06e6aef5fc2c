//! dense-cg CLI - solve dense SPD systems with Conjugate Gradient

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod cli;
mod problem;

use crate::cli::commands::*;

#[derive(Parser)]
#[command(name = "dense-cg")]
#[command(about = "Conjugate Gradient solver for dense SPD systems", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve A x = b (the built-in 10x10 system unless --problem is given)
    Solve {
        /// JSON problem file: { "matrix": [[...]], "rhs": [...], "solver": {...} }
        #[arg(short, long)]
        problem: Option<PathBuf>,

        /// Iteration cap (overrides the problem file)
        #[arg(short = 'n', long)]
        max_iterations: Option<usize>,

        /// Threshold on r.r (overrides the problem file)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Reject asymmetric matrices before iterating
        #[arg(long)]
        check_symmetry: bool,

        /// Print solver events as JSON lines instead of text
        #[arg(long)]
        events_json: bool,
    },

    /// Run the GEMM kernel smoke test
    GemmCheck,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dense_cg=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Execute command
    let result = match cli.command {
        Commands::Solve {
            problem,
            max_iterations,
            tolerance,
            check_symmetry,
            events_json,
        } => solve_problem(&SolveOptions {
            problem: problem.as_deref(),
            max_iterations,
            tolerance,
            check_symmetry,
            events_json,
        }),
        Commands::GemmCheck => gemm_check(),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{}", cli::format::format_error(&format!("{e:#}")));
        if cli.debug {
            eprintln!("\n{:#?}", e);
        } else {
            eprintln!("\n{}", "Run with --debug for more details".dimmed());
        }
        std::process::exit(1);
    }

    Ok(())
}
