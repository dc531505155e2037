//! # Schema & Profile Model
//!
//! Typed form of the two versioned contract documents:
//!
//! - `scene_schema_<version>.json`: structural contract ([`Schema`]):
//!   required top-level keys plus a recursive tree of [`FieldSpec`]s.
//! - `scene_profiles_<version>.json`: business-rule overlay ([`Profile`]):
//!   extra required keys and list-profile rules.
//!
//! Both are immutable once loaded and are `Send + Sync`, so one loaded
//! contract can back any number of concurrent validations.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use scx_core::shape::{to_bool, Shape};

/// Declared type of a field.
///
/// Unknown type names are preserved in [`FieldType::Other`] and match no
/// value, so a typo in a schema surfaces as a violation rather than being
/// silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Array,
    Object,
    Number,
    Str,
    Bool,
    Other(String),
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "array" => Self::Array,
            "object" => Self::Object,
            "number" => Self::Number,
            "string" => Self::Str,
            "boolean" => Self::Bool,
            _ => Self::Other(raw),
        }
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.name().to_string()
    }
}

impl FieldType {
    /// Name as written in the schema document.
    pub fn name(&self) -> &str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::Number => "number",
            Self::Str => "string",
            Self::Bool => "boolean",
            Self::Other(name) => name,
        }
    }

    /// Whether a present (non-null) value has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Number => value.as_f64().is_some_and(f64::is_finite),
            Self::Str => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Other(_) => false,
        }
    }
}

/// Structural rule for one field. Recurses through `fields` (object
/// members) and `item_fields` (members of every array element).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, FieldSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_fields: Option<BTreeMap<String, FieldSpec>>,

    /// Emit a violation when the field is absent or null.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub required: bool,

    /// Alternative sub-keys; at least one must hold a non-null value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least_one: Option<Vec<String>>,
}

/// Versioned structural contract for a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Top-level keys that must be present and non-null.
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// Business-rule overlay applied after structural validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Extra top-level keys required beyond the schema.
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub list_profile: ListProfileRules,
}

/// Rules for the `list_profile` block of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListProfileRules {
    #[serde(default)]
    pub required: Vec<String>,
    /// Columns that must always be hidden by default.
    #[serde(default)]
    pub hidden_columns_must_include: Vec<String>,
}

/// Accept `true`/`false` and the usual string tokens; anything else is `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match Shape::of(Some(&raw)) {
        shape @ (Shape::Bool(_) | Shape::Str(_)) => to_bool(shape, false),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_nested_schema() {
        let schema: Schema = serde_json::from_value(json!({
            "version": "v1",
            "required": ["code", "name"],
            "fields": {
                "code": {"type": "string", "required": true},
                "tiles": {"type": "array", "item_fields": {"key": {"type": "string", "required": true}}},
                "target": {"type": "object", "at_least_one": ["action_id", "menu_id", "route"]},
                "layout": {"type": "object", "description": "free-form"}
            }
        }))
        .unwrap();
        assert_eq!(schema.required, vec!["code", "name"]);
        assert_eq!(schema.fields["code"].field_type, Some(FieldType::Str));
        assert!(schema.fields["code"].required);
        let items = schema.fields["tiles"].item_fields.as_ref().unwrap();
        assert!(items["key"].required);
        assert_eq!(schema.fields["target"].at_least_one.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn unknown_type_is_preserved() {
        let spec: FieldSpec = serde_json::from_value(json!({"type": "integer"})).unwrap();
        assert_eq!(spec.field_type, Some(FieldType::Other("integer".into())));
        assert!(!FieldType::Other("integer".into()).matches(&json!(3)));
        assert_eq!(serde_json::to_value(&spec).unwrap(), json!({"type": "integer", "required": false}));
    }

    #[test]
    fn type_matching() {
        assert!(FieldType::Number.matches(&json!(1.5)));
        assert!(!FieldType::Number.matches(&json!("1")));
        assert!(FieldType::Object.matches(&json!({})));
        assert!(!FieldType::Object.matches(&json!([])));
        assert!(FieldType::Array.matches(&json!([])));
        assert!(FieldType::Bool.matches(&json!(false)));
        assert!(FieldType::Str.matches(&json!("")));
    }

    #[test]
    fn required_flag_is_lenient() {
        let spec: FieldSpec = serde_json::from_value(json!({"required": "yes"})).unwrap();
        assert!(spec.required);
        let spec: FieldSpec = serde_json::from_value(json!({"required": ["a"]})).unwrap();
        assert!(!spec.required);
    }

    #[test]
    fn parse_profile() {
        let profile: Profile = serde_json::from_value(json!({
            "required": ["access"],
            "list_profile": {
                "required": ["columns"],
                "hidden_columns_must_include": ["create_uid", "write_uid"]
            }
        }))
        .unwrap();
        assert_eq!(profile.required, vec!["access"]);
        assert_eq!(profile.list_profile.hidden_columns_must_include.len(), 2);
        assert_eq!(Profile::default().list_profile, ListProfileRules::default());
    }
}
