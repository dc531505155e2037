//! Contract resolution flags shared by subcommands.

use std::path::{Path, PathBuf};

use clap::Args;

use scx_schema::{SchemaLoader, SchemaRoots, SchemaVersion, DEFAULT_SCHEMA_DIR};

/// Where to find the scene contract and which version to use.
#[derive(Args, Debug, Clone)]
pub struct ContractArgs {
    /// Extra schema root, searched before all others. Repeatable.
    #[arg(long = "schema-root", value_name = "DIR")]
    pub schema_roots: Vec<PathBuf>,

    /// Schema version (v1, v2, 1, 2). Unrecognized values fall back to v1.
    #[arg(long, env = "SCX_SCHEMA_VERSION")]
    pub schema_version: Option<String>,

    /// Relative directory holding the contract documents under each root.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SCHEMA_DIR)]
    pub schema_dir: PathBuf,
}

impl ContractArgs {
    /// Normalized schema version.
    pub fn version(&self) -> SchemaVersion {
        SchemaVersion::normalize(self.schema_version.as_deref(), SchemaVersion::DEFAULT)
    }

    /// Build a loader: `--schema-root` flags, `SCX_SCHEMA_ROOT`, the
    /// repository root, the working directory, then deployment mounts.
    pub fn loader(&self, repo_root: &Path) -> SchemaLoader {
        let roots = SchemaRoots::from_env(&self.schema_roots, Some(repo_root.to_path_buf()));
        tracing::debug!(roots = ?roots.as_slice(), "schema root search order");
        SchemaLoader::new(roots.into_vec()).with_schema_dir(&self.schema_dir)
    }
}
