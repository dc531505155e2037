//! # scx CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scx_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use scx_cli::drift::{run_drift, DriftArgs};
use scx_cli::validate::{run_validate, ValidateArgs};

/// Scene contract audit tool.
///
/// Validates scene payloads against versioned schemas and profiles,
/// produces canonical snapshots, and detects drift between snapshots.
#[derive(Parser, Debug)]
#[command(name = "scx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a scene payload against the scene contract.
    Validate(ValidateArgs),

    /// Emit the canonical snapshot of a scene payload.
    Canonicalize(CanonicalizeArgs),

    /// Compare two snapshots and report drift.
    Drift(DriftArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::debug!("no repository root found; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });
    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &repo_root),
        Commands::Canonicalize(args) => run_canonicalize(&args, &repo_root),
        Commands::Drift(args) => run_drift(&args, &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Walk up from the current directory to the first directory holding the
/// shipped contract documents.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join(scx_schema::DEFAULT_SCHEMA_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
