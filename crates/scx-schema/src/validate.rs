//! # Structural Validation
//!
//! Walks a scene descriptor against a loaded [`Schema`] and [`Profile`]
//! and returns every violation found. Validation never fails and never
//! short-circuits: a completely empty or malformed scene simply yields
//! many violations, and callers receive the complete set for reporting.
//!
//! ## Order of checks
//!
//! 1. `schema.required`: each absent/null key yields `"<key> missing"`.
//! 2. `schema.fields`: depth-first, with dotted/indexed path prefixes.
//!    Per field: absent and required → missing; type mismatch → expected
//!    type (no descent); object with `fields` → recurse; array with
//!    `item_fields` → recurse into every element; object with
//!    `at_least_one` → at least one alternative must be non-null.
//! 3. `profile.required`: `"profile requires <key>"`.
//! 4. `profile.list_profile.required`: checked whenever `list_profile` is
//!    present; a non-object `list_profile` has no keys.
//! 5. `profile.list_profile.hidden_columns_must_include`: every mandated
//!    column must appear verbatim in the `list_profile.hidden_columns` array.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use scx_core::shape::{to_text, Shape};

use crate::model::{FieldSpec, Profile, Schema};

/// What went wrong at a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required value absent or null.
    Missing,
    /// Value present with the wrong type.
    ExpectedType { expected: String },
    /// Array element (or payload entry) that is not an object.
    ExpectedObject,
    /// None of the alternative sub-keys holds a value.
    MissingAnyOf { keys: Vec<String> },
    /// Top-level key required by the profile overlay.
    ProfileRequires,
    /// Mandated column absent from `list_profile.hidden_columns`.
    HiddenColumnMissing { column: String },
}

/// A single structural violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path to the offending value, with `[i]` for array elements.
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Human-readable message, e.g. `list_profile.columns missing`.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.path;
        match &self.kind {
            ViolationKind::Missing => write!(f, "{path} missing"),
            ViolationKind::ExpectedType { expected } => write!(f, "{path} expected {expected}"),
            ViolationKind::ExpectedObject => write!(f, "{path} expected object"),
            ViolationKind::MissingAnyOf { keys } => {
                write!(f, "{path} missing any of {}", keys.join(", "))
            }
            ViolationKind::ProfileRequires => write!(f, "profile requires {path}"),
            ViolationKind::HiddenColumnMissing { column } => {
                write!(f, "hidden_columns missing {column}")
            }
        }
    }
}

/// Validate one scene against a schema and profile.
pub fn validate_scene(scene: &Value, schema: &Schema, profile: &Profile) -> Vec<Violation> {
    let mut out = Vec::new();
    let record = scene.as_object();

    for key in &schema.required {
        if Shape::field(scene, key).is_absent() {
            out.push(Violation::new(key.as_str(), ViolationKind::Missing));
        }
    }

    validate_fields(record, &schema.fields, "", &mut out);

    for key in &profile.required {
        if Shape::field(scene, key).is_absent() {
            out.push(Violation::new(key.as_str(), ViolationKind::ProfileRequires));
        }
    }

    let list_profile = Shape::field(scene, "list_profile");
    if !list_profile.is_absent() {
        check_list_profile(list_profile.as_record(), profile, &mut out);
    }

    debug!(
        scene = %to_text(Shape::field(scene, "code")),
        violations = out.len(),
        "validated scene"
    );
    out
}

fn validate_fields(
    record: Option<&Map<String, Value>>,
    fields: &BTreeMap<String, FieldSpec>,
    prefix: &str,
    out: &mut Vec<Violation>,
) {
    for (key, spec) in fields {
        let path = format!("{prefix}{key}");
        let Some(value) = record.and_then(|m| m.get(key)).filter(|v| !v.is_null()) else {
            if spec.required {
                out.push(Violation::new(path, ViolationKind::Missing));
            }
            continue;
        };

        if let Some(expected) = &spec.field_type {
            if !expected.matches(value) {
                out.push(Violation::new(
                    path,
                    ViolationKind::ExpectedType {
                        expected: expected.name().to_string(),
                    },
                ));
                continue;
            }
        }

        if let (Some(nested), Some(object)) = (&spec.fields, value.as_object()) {
            validate_fields(Some(object), nested, &format!("{path}."), out);
        } else if let (Some(item_fields), Some(items)) = (&spec.item_fields, value.as_array()) {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                match item.as_object() {
                    Some(object) => {
                        validate_fields(Some(object), item_fields, &format!("{item_path}."), out)
                    }
                    None => out.push(Violation::new(item_path, ViolationKind::ExpectedObject)),
                }
            }
        } else if let (Some(alternatives), Some(object)) = (&spec.at_least_one, value.as_object()) {
            let satisfied = alternatives
                .iter()
                .any(|alt| !Shape::entry(object, alt).is_absent());
            if !satisfied {
                out.push(Violation::new(
                    path,
                    ViolationKind::MissingAnyOf {
                        keys: alternatives.clone(),
                    },
                ));
            }
        }
    }
}

/// A present but non-object `list_profile` is checked as if it had no keys.
fn check_list_profile(
    list_profile: Option<&Map<String, Value>>,
    profile: &Profile,
    out: &mut Vec<Violation>,
) {
    let rules = &profile.list_profile;
    let entry = |key: &str| list_profile.map_or(Shape::Absent, |m| Shape::entry(m, key));

    for key in &rules.required {
        if entry(key).is_absent() {
            out.push(Violation::new(format!("list_profile.{key}"), ViolationKind::Missing));
        }
    }

    if rules.hidden_columns_must_include.is_empty() {
        return;
    }
    // Exact array entries only: no trimming, no comma-separated strings.
    let hidden = entry("hidden_columns").as_list().unwrap_or_default();
    for column in &rules.hidden_columns_must_include {
        if !hidden.iter().any(|h| h.as_str() == Some(column.as_str())) {
            out.push(Violation::new(
                "list_profile.hidden_columns",
                ViolationKind::HiddenColumnMissing {
                    column: column.clone(),
                },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    fn profile(value: Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    fn messages(violations: &[Violation]) -> Vec<String> {
        violations.iter().map(Violation::message).collect()
    }

    #[test]
    fn nested_required_field_missing() {
        let s = schema(json!({
            "required": ["code"],
            "fields": {"list_profile": {"type": "object", "fields": {"columns": {"type": "array", "required": true}}}}
        }));
        let v = validate_scene(&json!({"code": "x", "list_profile": {}}), &s, &Profile::default());
        assert_eq!(messages(&v), vec!["list_profile.columns missing"]);
    }

    #[test]
    fn required_keys_each_reported_once() {
        let s = schema(json!({"required": ["code", "name"]}));
        let v = validate_scene(&json!({"code": null}), &s, &Profile::default());
        assert_eq!(messages(&v), vec!["code missing", "name missing"]);

        let v = validate_scene(&json!({"code": "c", "name": "n"}), &s, &Profile::default());
        assert!(v.is_empty());
    }

    #[test]
    fn optional_absent_fields_are_valid() {
        let s = schema(json!({"fields": {"layout": {"type": "object"}, "tiles": {"type": "array"}}}));
        assert!(validate_scene(&json!({}), &s, &Profile::default()).is_empty());
    }

    #[test]
    fn type_mismatch_stops_descent() {
        let s = schema(json!({
            "fields": {"list_profile": {"type": "object", "fields": {"columns": {"required": true}}}}
        }));
        let v = validate_scene(&json!({"list_profile": ["not", "an", "object"]}), &s, &Profile::default());
        assert_eq!(messages(&v), vec!["list_profile expected object"]);
    }

    #[test]
    fn type_names() {
        let s = schema(json!({
            "fields": {
                "count": {"type": "number"},
                "name": {"type": "string"},
                "flag": {"type": "boolean"},
                "rank": {"type": "integer"}
            }
        }));
        let v = validate_scene(
            &json!({"count": "3", "name": 7, "flag": "yes", "rank": 1}),
            &s,
            &Profile::default(),
        );
        assert_eq!(
            messages(&v),
            vec![
                "count expected number",
                "flag expected boolean",
                "name expected string",
                "rank expected integer"
            ]
        );
    }

    #[test]
    fn item_fields_applied_to_every_element() {
        let s = schema(json!({
            "fields": {"tiles": {"type": "array", "item_fields": {
                "key": {"type": "string", "required": true},
                "payload": {"type": "object"}
            }}}
        }));
        let v = validate_scene(
            &json!({"tiles": [{"key": "a"}, "oops", {"payload": []}]}),
            &s,
            &Profile::default(),
        );
        assert_eq!(
            messages(&v),
            vec![
                "tiles[1] expected object",
                "tiles[2].key missing",
                "tiles[2].payload expected object"
            ]
        );
    }

    #[test]
    fn at_least_one_alternative() {
        let s = schema(json!({
            "fields": {"target": {"type": "object", "at_least_one": ["action_id", "menu_id", "route"]}}
        }));
        let v = validate_scene(&json!({"target": {"action_id": null, "model": "x"}}), &s, &Profile::default());
        assert_eq!(messages(&v), vec!["target missing any of action_id, menu_id, route"]);
        assert_eq!(
            v[0].kind,
            ViolationKind::MissingAnyOf {
                keys: vec!["action_id".into(), "menu_id".into(), "route".into()]
            }
        );

        let ok = validate_scene(&json!({"target": {"route": "/p"}}), &s, &Profile::default());
        assert!(ok.is_empty());
    }

    #[test]
    fn profile_rules() {
        let p = profile(json!({
            "required": ["access"],
            "list_profile": {
                "required": ["columns", "row_primary"],
                "hidden_columns_must_include": ["create_uid", "write_uid"]
            }
        }));
        let v = validate_scene(
            &json!({"list_profile": {"columns": [], "row_primary": null, "hidden_columns": ["write_uid"]}}),
            &Schema::default(),
            &p,
        );
        assert_eq!(
            messages(&v),
            vec![
                "profile requires access",
                "list_profile.row_primary missing",
                "hidden_columns missing create_uid"
            ]
        );
    }

    #[test]
    fn list_profile_rules_skip_absent_list_profile() {
        let p = profile(json!({"list_profile": {"required": ["columns"], "hidden_columns_must_include": ["create_uid"]}}));
        assert!(validate_scene(&json!({}), &Schema::default(), &p).is_empty());
    }

    #[test]
    fn non_object_list_profile_has_no_keys() {
        let p = profile(json!({"list_profile": {"required": ["columns"], "hidden_columns_must_include": ["create_uid"]}}));
        for bogus in [json!("bogus"), json!(["a"]), json!(7)] {
            let v = validate_scene(&json!({"list_profile": bogus}), &Schema::default(), &p);
            assert_eq!(
                messages(&v),
                vec!["list_profile.columns missing", "hidden_columns missing create_uid"]
            );
        }
    }

    #[test]
    fn hidden_columns_match_exact_array_entries() {
        let p = profile(json!({"list_profile": {"hidden_columns_must_include": ["create_uid"]}}));
        for hidden in [json!("create_uid"), json!(" create_uid"), json!([" create_uid"])] {
            let v = validate_scene(
                &json!({"list_profile": {"hidden_columns": hidden}}),
                &Schema::default(),
                &p,
            );
            assert_eq!(messages(&v), vec!["hidden_columns missing create_uid"]);
        }
        let ok = validate_scene(
            &json!({"list_profile": {"hidden_columns": ["create_uid"]}}),
            &Schema::default(),
            &p,
        );
        assert!(ok.is_empty());
    }

    #[test]
    fn non_object_scene_never_panics() {
        let s = schema(json!({"required": ["code"], "fields": {"name": {"required": true}}}));
        let p = profile(json!({"required": ["access"]}));
        let v = validate_scene(&json!("garbage"), &s, &p);
        assert_eq!(messages(&v), vec!["code missing", "name missing", "profile requires access"]);
    }

    #[test]
    fn violation_serializes_with_kind_tag() {
        let v = Violation::new("list_profile.hidden_columns", ViolationKind::HiddenColumnMissing { column: "create_uid".into() });
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"path": "list_profile.hidden_columns", "kind": "hidden_column_missing", "column": "create_uid"})
        );
    }
}
