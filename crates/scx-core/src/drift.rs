//! # Drift Detection
//!
//! Compares two canonical snapshots of the same scene set, typically an
//! expected (committed) snapshot against one freshly exported from a live
//! deployment. Scenes are matched by `code`; a matched scene has drifted
//! when its per-scene digest differs, and the report names the top-level
//! fields whose canonical renderings differ.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::ScxError;
use crate::scene::CanonicalScene;

/// Digest of a whole canonical snapshot.
pub fn snapshot_digest(scenes: &[CanonicalScene]) -> Result<ContentDigest, ScxError> {
    Ok(sha256_digest(&CanonicalBytes::new(&scenes)?))
}

/// Digest of a single canonical scene.
pub fn scene_digest(scene: &CanonicalScene) -> Result<ContentDigest, ScxError> {
    Ok(sha256_digest(&CanonicalBytes::new(scene)?))
}

/// One scene present on both sides whose canonical form differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneChange {
    pub code: String,
    /// Top-level fields that differ, sorted.
    pub fields: Vec<String>,
    pub expected_digest: String,
    pub actual_digest: String,
}

/// Outcome of comparing two canonical snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Codes present only in the actual snapshot.
    pub added: Vec<String>,
    /// Codes present only in the expected snapshot.
    pub removed: Vec<String>,
    /// Codes present in both with differing content.
    pub changed: Vec<SceneChange>,
    pub expected_digest: String,
    pub actual_digest: String,
}

impl DriftReport {
    /// True if any scene was added, removed or changed.
    pub fn has_drift(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty())
    }
}

/// Compare an expected snapshot against an actual one.
///
/// When a snapshot carries several scenes with the same code, the last one
/// in canonical order represents that code.
pub fn compare_snapshots(
    expected: &[CanonicalScene],
    actual: &[CanonicalScene],
) -> Result<DriftReport, ScxError> {
    let expected_by_code = index_by_code(expected);
    let actual_by_code = index_by_code(actual);

    let added = actual_by_code
        .keys()
        .filter(|code| !expected_by_code.contains_key(*code))
        .map(|code| code.to_string())
        .collect();
    let removed = expected_by_code
        .keys()
        .filter(|code| !actual_by_code.contains_key(*code))
        .map(|code| code.to_string())
        .collect();

    let mut changed = Vec::new();
    for (code, before) in &expected_by_code {
        let Some(after) = actual_by_code.get(code) else {
            continue;
        };
        let before_digest = scene_digest(before)?;
        let after_digest = scene_digest(after)?;
        if before_digest != after_digest {
            changed.push(SceneChange {
                code: code.to_string(),
                fields: differing_fields(before, after)?,
                expected_digest: before_digest.to_string(),
                actual_digest: after_digest.to_string(),
            });
        }
    }

    Ok(DriftReport {
        added,
        removed,
        changed,
        expected_digest: snapshot_digest(expected)?.to_string(),
        actual_digest: snapshot_digest(actual)?.to_string(),
    })
}

fn index_by_code(scenes: &[CanonicalScene]) -> BTreeMap<&str, &CanonicalScene> {
    scenes.iter().map(|scene| (scene.code.as_str(), scene)).collect()
}

fn differing_fields(before: &CanonicalScene, after: &CanonicalScene) -> Result<Vec<String>, ScxError> {
    let before = serde_json::to_value(before).map_err(crate::error::CanonicalizationError::from)?;
    let after = serde_json::to_value(after).map_err(crate::error::CanonicalizationError::from)?;
    let (Some(before), Some(after)) = (before.as_object(), after.as_object()) else {
        return Ok(Vec::new());
    };
    let mut fields: Vec<String> = before
        .iter()
        .filter(|(key, value)| after.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    fields.sort();
    Ok(fields)
}
