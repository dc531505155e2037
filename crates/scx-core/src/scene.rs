//! # Scene Canonicalization
//!
//! Pure, total transform from a batch of heterogeneously shaped scene
//! descriptors into a deterministic, sorted, default-filled form. The
//! output is safe to hash and diff across deployments: the same scene set
//! in any input order canonicalizes to byte-identical JSON, and
//! canonicalizing an already canonical snapshot is a no-op.
//!
//! Rules applied per scene:
//!
//! - `code` falls back to `key`; entries with neither (or that are not
//!   objects at all) cannot be identified and are dropped.
//! - String sequences are trimmed, blank entries dropped, sorted.
//! - `column_labels` is re-emitted with sorted keys, values untouched.
//! - `filters` reduce to `{key, label, domain}` and sort by `key`.
//! - `tiles` reduce to a fixed field set, `payload` to an allow-list, and
//!   sort by `key`.
//! - `target` keeps only its allow-listed navigation keys.
//! - `access` is resolved by [`CanonicalAccess::resolve`].
//!
//! Entries that compare equal on their sort key are ordered by their JCS
//! rendering so duplicates cannot make the output order-dependent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::access::{scene_capabilities, CanonicalAccess};
use crate::canonical::CanonicalBytes;
use crate::shape::{to_records, to_string_list, to_text, Shape};

/// Navigation keys retained in a canonical `target`.
pub const TARGET_KEYS: &[&str] = &["action_id", "menu_id", "model", "view_mode", "route"];

/// Keys retained in a canonical tile `payload`.
pub const TILE_PAYLOAD_KEYS: &[&str] = &["action_xmlid", "menu_xmlid", "scene_key", "route"];

/// Canonical form of one scene descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalScene {
    pub code: String,
    pub name: String,
    /// Opaque layout object; `{}` when absent or not an object.
    pub layout: Value,
    pub access: CanonicalAccess,
    pub target: BTreeMap<String, Value>,
    pub list_profile: CanonicalListProfile,
    pub default_sort: String,
    pub filters: Vec<CanonicalFilter>,
    pub tiles: Vec<CanonicalTile>,
}

/// Canonical list-view profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalListProfile {
    pub columns: Vec<String>,
    pub hidden_columns: Vec<String>,
    pub column_labels: BTreeMap<String, Value>,
    pub row_primary: String,
    pub row_secondary: String,
}

/// Canonical search filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFilter {
    pub key: String,
    pub label: String,
    /// Filter domain; an empty sequence when the source was not an array.
    pub domain: Vec<Value>,
}

/// Canonical dashboard tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTile {
    pub key: String,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub scene_key: String,
    pub required_capabilities: Vec<String>,
    pub payload: BTreeMap<String, Value>,
}

/// Canonicalize a batch of scene descriptors, sorted by `code`.
pub fn canonicalize_scenes(scenes: &[Value]) -> Vec<CanonicalScene> {
    let canonical: Vec<CanonicalScene> = scenes.iter().filter_map(canonicalize_scene).collect();
    sort_by_key_then_bytes(canonical, |scene| scene.code.clone())
}

/// Canonicalize one scene descriptor.
///
/// Returns `None` for entries that are not objects or carry neither a
/// `code` nor a `key`.
pub fn canonicalize_scene(scene: &Value) -> Option<CanonicalScene> {
    let record = scene.as_object()?;
    let code = match to_text(Shape::entry(record, "code")) {
        code if code.is_empty() => to_text(Shape::entry(record, "key")),
        code => code,
    };
    if code.is_empty() {
        return None;
    }

    let tiles = canonical_tiles(Shape::entry(record, "tiles"));
    let scene_caps = scene_capabilities(record);
    let access = CanonicalAccess::resolve(
        Shape::entry(record, "access"),
        std::iter::once(scene_caps.as_slice())
            .chain(tiles.iter().map(|tile| tile.required_capabilities.as_slice())),
    );

    Some(CanonicalScene {
        code,
        name: to_text(Shape::entry(record, "name")),
        layout: Shape::entry(record, "layout")
            .as_record()
            .map_or_else(|| Value::Object(Map::new()), |m| Value::Object(m.clone())),
        access,
        target: retain_keys(Shape::entry(record, "target"), TARGET_KEYS),
        list_profile: canonical_list_profile(Shape::entry(record, "list_profile")),
        default_sort: match Shape::entry(record, "default_sort") {
            Shape::Str(s) => s.trim().to_string(),
            _ => String::new(),
        },
        filters: canonical_filters(Shape::entry(record, "filters")),
        tiles,
    })
}

fn canonical_list_profile(shape: Shape<'_>) -> CanonicalListProfile {
    let Some(profile) = shape.as_record() else {
        return CanonicalListProfile::default();
    };
    CanonicalListProfile {
        columns: to_string_list(Shape::entry(profile, "columns")),
        hidden_columns: to_string_list(Shape::entry(profile, "hidden_columns")),
        column_labels: Shape::entry(profile, "column_labels")
            .as_record()
            .map(|labels| labels.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        row_primary: to_text(Shape::entry(profile, "row_primary")),
        row_secondary: to_text(Shape::entry(profile, "row_secondary")),
    }
}

fn canonical_filters(shape: Shape<'_>) -> Vec<CanonicalFilter> {
    let filters = to_records(shape)
        .into_iter()
        .map(|filter| CanonicalFilter {
            key: to_text(Shape::entry(filter, "key")),
            label: to_text(Shape::entry(filter, "label")),
            domain: Shape::entry(filter, "domain")
                .as_list()
                .map(<[Value]>::to_vec)
                .unwrap_or_default(),
        })
        .collect();
    sort_by_key_then_bytes(filters, |filter| filter.key.clone())
}

fn canonical_tiles(shape: Shape<'_>) -> Vec<CanonicalTile> {
    let tiles = to_records(shape)
        .into_iter()
        .map(|tile| CanonicalTile {
            key: to_text(Shape::entry(tile, "key")),
            title: to_text(Shape::entry(tile, "title")),
            subtitle: to_text(Shape::entry(tile, "subtitle")),
            icon: to_text(Shape::entry(tile, "icon")),
            scene_key: to_text(Shape::entry(tile, "scene_key")),
            required_capabilities: to_string_list(Shape::entry(tile, "required_capabilities")),
            payload: retain_keys(Shape::entry(tile, "payload"), TILE_PAYLOAD_KEYS),
        })
        .collect();
    sort_by_key_then_bytes(tiles, |tile| tile.key.clone())
}

/// Keep only allow-listed, non-null entries of a record.
fn retain_keys(shape: Shape<'_>, allowed: &[&str]) -> BTreeMap<String, Value> {
    let Some(record) = shape.as_record() else {
        return BTreeMap::new();
    };
    allowed
        .iter()
        .filter_map(|key| match record.get(*key) {
            None | Some(Value::Null) => None,
            Some(value) => Some((key.to_string(), value.clone())),
        })
        .collect()
}

/// Sort by a string key, breaking ties by the JCS rendering of the item.
fn sort_by_key_then_bytes<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    let mut keyed: Vec<((String, Vec<u8>), T)> = items
        .into_iter()
        .map(|item| {
            let bytes = CanonicalBytes::new(&item)
                .map(|cb| cb.as_bytes().to_vec())
                .unwrap_or_default();
            ((key(&item), bytes), item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tile_capabilities_join_access_capabilities() {
        let scenes = vec![json!({
            "code": "projects",
            "access": {"required_capabilities": ["cap.read"]},
            "tiles": [{"key": "t1", "required_capabilities": ["cap.write"]}]
        })];
        let out = canonicalize_scenes(&scenes);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].access.required_capabilities, vec!["cap.read", "cap.write"]);
        assert!(out[0].access.has_access_clause);
    }

    #[test]
    fn missing_access_gets_defaults() {
        let out = canonicalize_scenes(&[json!({"code": "home"})]);
        let access = serde_json::to_value(&out[0].access).unwrap();
        assert_eq!(access["visible"], true);
        assert_eq!(access["allowed"], true);
        assert_eq!(access["reason_code"], "OK");
        assert_eq!(access["required_capabilities"], json!([]));
        assert_eq!(access["has_access_clause"], false);
    }

    #[test]
    fn code_falls_back_to_key() {
        let out = canonicalize_scenes(&[json!({"key": "fallback"})]);
        assert_eq!(out[0].code, "fallback");
    }

    #[test]
    fn unidentifiable_entries_are_dropped() {
        let out = canonicalize_scenes(&[json!({"name": "anon"}), json!(42), json!({"code": "ok"})]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, "ok");
    }

    #[test]
    fn scenes_sorted_by_code() {
        let out = canonicalize_scenes(&[json!({"code": "b"}), json!({"code": "a"})]);
        let codes: Vec<_> = out.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "b"]);
    }

    #[test]
    fn target_and_payload_are_allow_listed() {
        let out = canonicalize_scenes(&[json!({
            "code": "x",
            "target": {"action_id": 7, "debug": true, "route": "/x", "menu_id": null},
            "tiles": [{"key": "t", "payload": {"scene_key": "y", "trace_id": "abc"}}]
        })]);
        assert_eq!(
            serde_json::to_value(&out[0].target).unwrap(),
            json!({"action_id": 7, "route": "/x"})
        );
        assert_eq!(
            serde_json::to_value(&out[0].tiles[0].payload).unwrap(),
            json!({"scene_key": "y"})
        );
    }

    #[test]
    fn list_profile_sorted_labels_untouched() {
        let out = canonicalize_scenes(&[json!({
            "code": "x",
            "list_profile": {
                "columns": ["name", " id "],
                "hidden_columns": ["write_uid", "create_uid"],
                "column_labels": {"name": "Name", "id": {"en": "ID"}},
                "row_primary": "name"
            }
        })]);
        let lp = &out[0].list_profile;
        assert_eq!(lp.columns, vec!["id", "name"]);
        assert_eq!(lp.hidden_columns, vec!["create_uid", "write_uid"]);
        assert_eq!(lp.column_labels.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(lp.column_labels["id"], json!({"en": "ID"}));
        assert_eq!(lp.row_primary, "name");
        assert_eq!(lp.row_secondary, "");
    }

    #[test]
    fn filters_reduced_and_sorted() {
        let out = canonicalize_scenes(&[json!({
            "code": "x",
            "filters": [
                {"key": "mine", "label": "Mine", "domain": [["user_id", "=", 1]], "extra": 1},
                {"key": "active", "label": "Active", "domain": "bad"}
            ]
        })]);
        let filters = &out[0].filters;
        assert_eq!(filters[0].key, "active");
        assert!(filters[0].domain.is_empty());
        assert_eq!(filters[1].domain, vec![json!(["user_id", "=", 1])]);
    }

    #[test]
    fn layout_non_object_becomes_empty_object() {
        let out = canonicalize_scenes(&[json!({"code": "x", "layout": "grid"})]);
        assert_eq!(out[0].layout, json!({}));
    }

    #[test]
    fn canonical_output_reparses_to_itself() {
        let raw = vec![json!({
            "code": "x",
            "required_capabilities": ["cap.scene"],
            "access": {"visible": "yes", "required_capabilities": ["cap.read"]},
            "tiles": [{"key": "b", "required_capabilities": ["cap.b"]}, {"key": "a"}]
        })];
        let once = canonicalize_scenes(&raw);
        let as_values: Vec<Value> = once.iter().map(|s| serde_json::to_value(s).unwrap()).collect();
        assert_eq!(canonicalize_scenes(&as_values), once);
    }
}
