//! # scx-cli — Scene Contract Audit CLI
//!
//! Thin front end over `scx-core` and `scx-schema` for periodic audits of
//! exported or live scene payloads.
//!
//! ## Subcommands
//!
//! - `validate`: structural + profile validation against a versioned contract
//! - `canonicalize`: stable canonical snapshot, optionally with its digest
//! - `drift`: compare two snapshots by scene code
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to the library crates and return exit codes.

use std::path::{Path, PathBuf};

pub mod canonicalize;
pub mod config;
pub mod drift;
pub mod validate;

/// Resolve a possibly relative path against the repository root.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}
