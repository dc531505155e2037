//! # Canonicalize Subcommand
//!
//! Emits the canonical snapshot of a scene payload. The output is stable:
//! the same payload always renders to the same bytes, so snapshots can be
//! committed and diffed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use scx_core::{canonicalize_scenes, snapshot_digest};
use scx_schema::load_scene_payload;

/// Arguments for the `scx canonicalize` subcommand.
#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// Scene payload (JSON or YAML).
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Write the snapshot here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also print the snapshot digest (to stderr when writing to stdout).
    #[arg(long)]
    pub digest: bool,
}

/// Execute the canonicalize subcommand.
pub fn run_canonicalize(args: &CanonicalizeArgs, repo_root: &Path) -> Result<u8> {
    let payload = crate::resolve_path(&args.payload, repo_root);
    let scenes = load_scene_payload(&payload)
        .with_context(|| format!("failed to load payload {}", payload.display()))?;

    let canonical = canonicalize_scenes(&scenes);
    if canonical.len() != scenes.len() {
        tracing::warn!(
            dropped = scenes.len() - canonical.len(),
            "scenes without code or key were dropped"
        );
    }

    let mut rendered = serde_json::to_string_pretty(&canonical)?;
    rendered.push('\n');

    let digest = if args.digest {
        Some(snapshot_digest(&canonical).context("failed to digest snapshot")?)
    } else {
        None
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), scenes = canonical.len(), "wrote canonical snapshot");
            if let Some(digest) = digest {
                println!("{digest}");
            }
        }
        None => {
            print!("{rendered}");
            if let Some(digest) = digest {
                eprintln!("{digest}");
            }
        }
    }

    Ok(0)
}
