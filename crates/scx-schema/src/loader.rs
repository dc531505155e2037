//! # Schema/Profile Loader
//!
//! Resolves a schema version to its structural [`Schema`] and business-rule
//! [`Profile`] by searching an ordered list of candidate root directories.
//!
//! ## Resolution
//!
//! The contract documents live at conventional relative paths
//! `<schema_dir>/scene_schema_<version>.json` and
//! `<schema_dir>/scene_profiles_<version>.json`. Under each root the loader
//! tries the relative path as given, then the same path with its leading
//! namespace segment stripped (so both a repository checkout containing
//! `addons/scene_contract/schema/...` and an addons mount containing
//! `scene_contract/schema/...` resolve). The first root holding the file
//! wins; earlier roots always take precedence over later ones.
//!
//! ## Configuration
//!
//! The loader never reads process state. Roots are passed in explicitly,
//! typically assembled by [`SchemaRoots`]; only [`SchemaRoots::from_env`]
//! consults the environment, and callers choose whether to use it.

use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::contract::SceneContract;
use crate::model::{Profile, Schema};
use crate::version::SchemaVersion;

/// Environment variable naming the highest-precedence schema root.
pub const SCHEMA_ROOT_ENV: &str = "SCX_SCHEMA_ROOT";

/// Default relative directory holding the contract documents.
pub const DEFAULT_SCHEMA_DIR: &str = "addons/scene_contract/schema";

/// Fixed deployment mount points searched after the dynamic roots.
pub const DEPLOYMENT_MOUNTS: &[&str] = &[
    "/mnt/extra-addons",
    "/mnt/addons",
    "/opt/odoo/addons",
    "/usr/lib/python3/dist-packages/odoo/addons",
];

/// No candidate root contains the requested file under any variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("schema file '{requested}' not found under any of {} candidate paths", .searched.len())]
pub struct SchemaNotFoundError {
    /// The relative path originally requested.
    pub requested: String,
    /// Every absolute candidate that was checked, in search order.
    pub searched: Vec<PathBuf>,
}

/// Error loading a contract document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document could not be located.
    #[error(transparent)]
    NotFound(#[from] SchemaNotFoundError),

    /// The document was located but could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the contract model.
    #[error("invalid contract document '{}': {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Ordered, duplicate-free list of candidate roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRoots {
    roots: Vec<PathBuf>,
}

impl SchemaRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root unless it is empty or already listed.
    pub fn push(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !root.as_os_str().is_empty() && !self.roots.contains(&root) {
            self.roots.push(root);
        }
        self
    }

    /// Append a root if present.
    pub fn push_opt(self, root: Option<impl Into<PathBuf>>) -> Self {
        match root {
            Some(root) => self.push(root),
            None => self,
        }
    }

    /// Append the fixed [`DEPLOYMENT_MOUNTS`].
    pub fn with_deployment_mounts(self) -> Self {
        DEPLOYMENT_MOUNTS.iter().fold(self, |roots, mount| roots.push(*mount))
    }

    /// Conventional search order: explicit overrides, environment root,
    /// repository root, working directory, deployment mounts.
    pub fn conventional(
        overrides: &[PathBuf],
        env_root: Option<PathBuf>,
        repo_root: Option<PathBuf>,
        cwd: Option<PathBuf>,
    ) -> Self {
        overrides
            .iter()
            .fold(Self::new(), |roots, root| roots.push(root.clone()))
            .push_opt(env_root)
            .push_opt(repo_root)
            .push_opt(cwd)
            .with_deployment_mounts()
    }

    /// [`SchemaRoots::conventional`] with the environment root taken from
    /// [`SCHEMA_ROOT_ENV`] and the working directory from the process.
    pub fn from_env(overrides: &[PathBuf], repo_root: Option<PathBuf>) -> Self {
        let env_root = std::env::var_os(SCHEMA_ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cwd = std::env::current_dir().ok();
        Self::conventional(overrides, env_root, repo_root, cwd)
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn into_vec(self) -> Vec<PathBuf> {
        self.roots
    }
}

/// Loads versioned schema and profile documents from an ordered root list.
///
/// Each call re-reads from disk; the loader holds no cache and no mutable
/// state, so it can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct SchemaLoader {
    roots: Vec<PathBuf>,
    schema_dir: PathBuf,
}

impl SchemaLoader {
    /// Create a loader over `roots`, searched in order.
    pub fn new(roots: impl Into<Vec<PathBuf>>) -> Self {
        Self {
            roots: roots.into(),
            schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
        }
    }

    /// Override the relative directory holding the contract documents.
    pub fn with_schema_dir(mut self, schema_dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = schema_dir.into();
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Locate `relative` under the first root that contains it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaNotFoundError`] carrying `relative` and every
    /// candidate checked when no root contains the file.
    pub fn resolve(&self, relative: &Path) -> Result<PathBuf, SchemaNotFoundError> {
        let variants = path_variants(relative);
        let mut searched = Vec::with_capacity(self.roots.len() * variants.len());

        for root in &self.roots {
            for variant in &variants {
                let candidate = root.join(variant);
                if candidate.is_file() {
                    debug!(path = %candidate.display(), root = %root.display(), "resolved contract document");
                    return Ok(candidate);
                }
                trace!(path = %candidate.display(), "contract document candidate missing");
                searched.push(candidate);
            }
        }

        Err(SchemaNotFoundError {
            requested: relative.display().to_string(),
            searched,
        })
    }

    /// Load the structural schema for `version`.
    pub fn load_schema(&self, version: SchemaVersion) -> Result<Schema, LoadError> {
        self.load_document(&self.schema_dir.join(version.schema_file()))
    }

    /// Load the business-rule profile for `version`.
    pub fn load_profile(&self, version: SchemaVersion) -> Result<Profile, LoadError> {
        self.load_document(&self.schema_dir.join(version.profile_file()))
    }

    /// Load schema and profile for `version` together.
    pub fn load_contract(&self, version: SchemaVersion) -> Result<SceneContract, LoadError> {
        Ok(SceneContract {
            version,
            schema: self.load_schema(version)?,
            profile: self.load_profile(version)?,
        })
    }

    fn load_document<T: DeserializeOwned>(&self, relative: &Path) -> Result<T, LoadError> {
        let path = self.resolve(relative)?;
        let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            path,
            reason: e.to_string(),
        })
    }
}

/// The path as given, then with its leading namespace segment stripped.
fn path_variants(relative: &Path) -> Vec<PathBuf> {
    let mut variants = vec![relative.to_path_buf()];
    let mut components = relative
        .components()
        .skip_while(|c| matches!(c, Component::CurDir));
    if components.next().is_some() {
        let stripped: PathBuf = components.collect();
        if !stripped.as_os_str().is_empty() && !variants.contains(&stripped) {
            variants.push(stripped);
        }
    }
    variants
}
