//! # Access Normalization & Capability Aggregation
//!
//! A scene declares capability requirements in three places: on the scene
//! itself, inside its `access` clause, and on each tile. The canonical
//! access clause carries the union of all three so that a drift audit sees
//! one authoritative, sorted, duplicate-free capability list per scene.
//!
//! Defaulting rules:
//!
//! - `visible` defaults to `true`.
//! - `allowed` defaults to the resolved `visible` value.
//! - `reason_code` defaults to [`REASON_OK`] when allowed, otherwise
//!   [`REASON_PERMISSION_DENIED`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shape::{to_bool, to_string_list, to_text, Shape};

/// Reason code for an allowed scene.
pub const REASON_OK: &str = "OK";

/// Reason code for a scene the caller may not open.
pub const REASON_PERMISSION_DENIED: &str = "PERMISSION_DENIED";

/// Canonical access clause of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalAccess {
    /// Whether the scene is shown at all.
    pub visible: bool,
    /// Whether the scene may be opened. Defaults to `visible`.
    pub allowed: bool,
    /// Machine-readable reason for the allow decision.
    pub reason_code: String,
    /// Hint for the frontend when access is denied.
    pub suggested_action: String,
    /// Sorted, duplicate-free union of scene, access and tile capabilities.
    pub required_capabilities: Vec<String>,
    /// Length of `required_capabilities`.
    pub required_capabilities_count: usize,
    /// True iff `required_capabilities` is non-empty.
    pub has_access_clause: bool,
}

impl Default for CanonicalAccess {
    fn default() -> Self {
        Self::resolve(Shape::Absent, std::iter::empty::<&[String]>())
    }
}

impl CanonicalAccess {
    /// Resolve the canonical access clause from the raw `access` shape and
    /// any further capability sources (scene-level and per-tile lists).
    pub fn resolve<'a, I>(access: Shape<'_>, extra_capabilities: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let clause = access.as_record();
        let read = |key: &str| clause.map_or(Shape::Absent, |m| Shape::entry(m, key));

        let visible = to_bool(read("visible"), true);
        let allowed = to_bool(read("allowed"), visible);

        let reason_code = match to_text(read("reason_code")) {
            code if code.is_empty() => default_reason(allowed).to_string(),
            code => code,
        };

        let declared = to_string_list(read("required_capabilities"));
        let extra = aggregate_capabilities(extra_capabilities);
        let required_capabilities = aggregate_capabilities([declared.as_slice(), extra.as_slice()]);

        Self {
            visible,
            allowed,
            reason_code,
            suggested_action: to_text(read("suggested_action")),
            required_capabilities_count: required_capabilities.len(),
            has_access_clause: !required_capabilities.is_empty(),
            required_capabilities,
        }
    }
}

fn default_reason(allowed: bool) -> &'static str {
    if allowed {
        REASON_OK
    } else {
        REASON_PERMISSION_DENIED
    }
}

/// Union capability lists into one sorted list without duplicates.
pub fn aggregate_capabilities<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut union = BTreeSet::new();
    for source in sources {
        extend_capabilities(&mut union, source);
    }
    union.into_iter().collect()
}

fn extend_capabilities(union: &mut BTreeSet<String>, caps: &[String]) {
    union.extend(
        caps.iter()
            .map(|cap| cap.trim())
            .filter(|cap| !cap.is_empty())
            .map(str::to_string),
    );
}

/// Scene-level capability list (`scene.required_capabilities`).
pub(crate) fn scene_capabilities(scene: &Map<String, Value>) -> Vec<String> {
    to_string_list(Shape::entry(scene, "required_capabilities"))
}
