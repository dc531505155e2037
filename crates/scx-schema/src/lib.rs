//! # scx-schema — Scene Contract Resolution & Validation
//!
//! Resolves versioned scene contracts and validates scene descriptors
//! against them.
//!
//! ## Loader (`loader`)
//!
//! [`SchemaLoader`] resolves `scene_schema_<version>.json` and
//! `scene_profiles_<version>.json` by searching an explicit, ordered list
//! of root directories. A document missing from every root is a fatal
//! [`SchemaNotFoundError`]; there is no partial schema.
//!
//! ## Validator (`validate`)
//!
//! [`validate_scene`] walks a scene against a [`Schema`] and [`Profile`]
//! and returns typed [`Violation`]s. It never fails: malformed scenes
//! produce violations, not errors. [`validate_scenes`] aggregates a whole
//! payload into a [`ValidationReport`] keyed by scene code.
//!
//! ## Crate Policy
//!
//! - Depends only on `scx-core` internally.
//! - This is not a general JSON Schema validator: no `$ref`, no boolean
//!   combinators, no format keywords.

pub mod contract;
pub mod loader;
pub mod model;
pub mod payload;
pub mod report;
pub mod validate;
pub mod version;

pub use contract::SceneContract;
pub use loader::{
    LoadError, SchemaLoader, SchemaNotFoundError, SchemaRoots, DEFAULT_SCHEMA_DIR,
    DEPLOYMENT_MOUNTS, SCHEMA_ROOT_ENV,
};
pub use model::{FieldSpec, FieldType, ListProfileRules, Profile, Schema};
pub use payload::{extract_scenes, load_scene_payload, read_document, PayloadError};
pub use report::{validate_scenes, SceneViolations, ValidationReport};
pub use validate::{validate_scene, Violation, ViolationKind};
pub use version::SchemaVersion;
