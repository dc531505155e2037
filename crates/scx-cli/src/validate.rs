//! # Validate Subcommand
//!
//! Validates every scene in a payload file against the scene contract for
//! one schema version and reports violations per scene code.
//!
//! Exit codes: 0 when every scene is clean, 1 when any scene has
//! violations. Contract resolution failures are operational errors.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scx_schema::{load_scene_payload, ValidationReport};

use crate::config::ContractArgs;

/// Arguments for the `scx validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Scene payload (JSON or YAML): an array, or an object with `scenes`.
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    #[command(flatten)]
    pub contract: ContractArgs,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path) -> Result<u8> {
    let version = args.contract.version();
    let contract = args
        .contract
        .loader(repo_root)
        .load_contract(version)
        .with_context(|| format!("failed to load scene contract {version}"))?;

    let payload = crate::resolve_path(&args.payload, repo_root);
    let scenes = load_scene_payload(&payload)
        .with_context(|| format!("failed to load payload {}", payload.display()))?;

    tracing::info!(%version, scenes = scenes.len(), "validating scene payload");
    let report = contract.validate_all(&scenes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, &version.to_string()));
    }

    Ok(u8::from(!report.is_clean()))
}

/// Text rendering of a validation report.
pub fn render_report(report: &ValidationReport, version: &str) -> String {
    let mut out = format!(
        "Scenes ({version}): {}/{} passed\n",
        report.passed(),
        report.total
    );
    for failure in &report.failures {
        out.push_str(&format!(
            "  FAIL: {} ({} violation(s))\n",
            failure.scene,
            failure.violations.len()
        ));
        for violation in &failure.violations {
            out.push_str(&format!("    - {violation}\n"));
        }
    }
    if !report.is_clean() {
        out.push_str(&format!(
            "\n{} violation(s) across {} scene(s).\n",
            report.violation_count(),
            report.failed()
        ));
    }
    out
}
