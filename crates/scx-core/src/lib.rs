//! # scx-core — Scene Contract Canonicalization
//!
//! Leaf crate of the scene contract engine. It turns scene descriptors
//! (JSON documents describing a navigable UI surface: layout, access
//! rules, list columns, tiles, filters) into a canonical form that is
//! stable under reordering and re-canonicalization, and fingerprints that
//! form for drift detection across deployments.
//!
//! ## Key Design Principles
//!
//! 1. **Total decoding.** Every field read goes through [`shape::Shape`], an
//!    exhaustive tagged union over the JSON kinds. Malformed input degrades
//!    to defaults; canonicalization never fails.
//!
//! 2. **One capability list.** The canonical `access` clause carries the
//!    union of scene, access-clause and tile capability requirements.
//!
//! 3. **`CanonicalBytes` for hashing.** Digests are only computed from
//!    RFC 8785 (JCS) bytes, so equal snapshots hash equally everywhere.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scx-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod access;
pub mod canonical;
pub mod digest;
pub mod drift;
pub mod error;
pub mod scene;
pub mod shape;

// Re-export primary types for ergonomic imports.
pub use access::{aggregate_capabilities, CanonicalAccess, REASON_OK, REASON_PERMISSION_DENIED};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest, DigestAlgorithm};
pub use drift::{compare_snapshots, scene_digest, snapshot_digest, DriftReport, SceneChange};
pub use error::{CanonicalizationError, ScxError};
pub use scene::{
    canonicalize_scene, canonicalize_scenes, CanonicalFilter, CanonicalListProfile,
    CanonicalScene, CanonicalTile, TARGET_KEYS, TILE_PAYLOAD_KEYS,
};
pub use shape::{to_bool, to_string_list, Shape};
