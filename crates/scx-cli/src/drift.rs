//! # Drift Subcommand
//!
//! Compares two scene payloads (raw or already canonical) and reports
//! scenes added, removed or changed. Both sides are canonicalized first;
//! canonicalization is idempotent, so committed snapshots and live
//! exports can be mixed freely.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scx_core::{canonicalize_scenes, compare_snapshots, CanonicalScene, DriftReport};
use scx_schema::load_scene_payload;

/// Arguments for the `scx drift` subcommand.
#[derive(Args, Debug)]
pub struct DriftArgs {
    /// Expected snapshot or payload.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,

    /// Actual snapshot or payload.
    #[arg(value_name = "ACTUAL")]
    pub actual: PathBuf,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the drift subcommand. Exit code 1 signals drift.
pub fn run_drift(args: &DriftArgs, repo_root: &Path) -> Result<u8> {
    let expected = load_canonical(&crate::resolve_path(&args.expected, repo_root))?;
    let actual = load_canonical(&crate::resolve_path(&args.actual, repo_root))?;

    let report = compare_snapshots(&expected, &actual).context("failed to compare snapshots")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_drift(&report));
    }

    Ok(u8::from(report.has_drift()))
}

fn load_canonical(path: &Path) -> Result<Vec<CanonicalScene>> {
    let scenes = load_scene_payload(path)
        .with_context(|| format!("failed to load payload {}", path.display()))?;
    Ok(canonicalize_scenes(&scenes))
}

/// Text rendering of a drift report.
pub fn render_drift(report: &DriftReport) -> String {
    if !report.has_drift() {
        return format!("No drift ({})\n", report.actual_digest);
    }
    let mut out = format!(
        "Drift detected\n  expected: {}\n  actual:   {}\n",
        report.expected_digest, report.actual_digest
    );
    for code in &report.added {
        out.push_str(&format!("  ADDED:   {code}\n"));
    }
    for code in &report.removed {
        out.push_str(&format!("  REMOVED: {code}\n"));
    }
    for change in &report.changed {
        out.push_str(&format!(
            "  CHANGED: {} [{}]\n",
            change.code,
            change.fields.join(", ")
        ));
    }
    out
}
