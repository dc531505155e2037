//! # Shape Decoding — Tagged-Union View of Untrusted JSON
//!
//! Scene payloads arrive from external producers with heterogeneous shapes:
//! a field may be absent, `null`, a string where a list was expected, or a
//! number where a boolean was expected. Rather than probing types ad hoc at
//! every use site, every field read goes through [`Shape`], a borrowed
//! tagged union with one variant per JSON kind plus [`Shape::Absent`].
//!
//! The decoders in this module are total: they never fail and never panic.
//! Malformed input degrades to the caller-supplied or type-appropriate
//! default (empty string, empty list, `false`).

use serde_json::{Map, Value};

/// Borrowed, exhaustive view of an optional JSON value.
///
/// `null` and a missing key both decode to [`Shape::Absent`]; the scene
/// contract treats them identically everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Key missing or value `null`.
    Absent,
    /// Native JSON boolean.
    Bool(bool),
    /// Any JSON number (integer or float).
    Number(&'a serde_json::Number),
    /// JSON string.
    Str(&'a str),
    /// JSON array.
    List(&'a [Value]),
    /// JSON object.
    Record(&'a Map<String, Value>),
}

impl<'a> Shape<'a> {
    /// Classify an optional value.
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => Self::Number(n),
            Some(Value::String(s)) => Self::Str(s),
            Some(Value::Array(items)) => Self::List(items),
            Some(Value::Object(map)) => Self::Record(map),
        }
    }

    /// Classify `parent[key]`. A non-object parent yields [`Shape::Absent`].
    pub fn field(parent: &'a Value, key: &str) -> Self {
        Self::of(parent.as_object().and_then(|m| m.get(key)))
    }

    /// Classify `record[key]`.
    pub fn entry(record: &'a Map<String, Value>, key: &str) -> Self {
        Self::of(record.get(key))
    }

    /// True for [`Shape::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The record, if this shape is one.
    pub fn as_record(&self) -> Option<&'a Map<String, Value>> {
        match *self {
            Self::Record(map) => Some(map),
            _ => None,
        }
    }

    /// The list, if this shape is one.
    pub fn as_list(&self) -> Option<&'a [Value]> {
        match *self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Generic truthiness: empty strings, zero, empty containers and
    /// absent values are falsy; everything else is truthy.
    pub fn truthy(&self) -> bool {
        match *self {
            Self::Absent => false,
            Self::Bool(b) => b,
            Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Record(map) => !map.is_empty(),
        }
    }
}

const TRUTHY_TOKENS: &[&str] = &["1", "true", "yes", "y", "on"];
const FALSY_TOKENS: &[&str] = &["0", "false", "no", "n", "off"];

/// Coerce a shape to a boolean.
///
/// - Native booleans pass through.
/// - Strings are matched case-insensitively (after trimming) against the
///   truthy tokens `1 true yes y on` and falsy tokens `0 false no n off`;
///   any other string returns `default`.
/// - Absent values return `default`.
/// - Numbers and containers use generic truthiness.
pub fn to_bool(shape: Shape<'_>, default: bool) -> bool {
    match shape {
        Shape::Absent => default,
        Shape::Bool(b) => b,
        Shape::Str(s) => {
            let token = s.trim().to_ascii_lowercase();
            if TRUTHY_TOKENS.contains(&token.as_str()) {
                true
            } else if FALSY_TOKENS.contains(&token.as_str()) {
                false
            } else {
                default
            }
        }
        other => other.truthy(),
    }
}

/// Decode a shape as a trimmed string.
///
/// Strings are trimmed; numbers and booleans are rendered; everything else
/// decodes to the empty string.
pub fn to_text(shape: Shape<'_>) -> String {
    match shape {
        Shape::Str(s) => s.trim().to_string(),
        Shape::Number(n) => n.to_string(),
        Shape::Bool(b) => b.to_string(),
        Shape::Absent | Shape::List(_) | Shape::Record(_) => String::new(),
    }
}

/// Decode a shape as a normalized string list.
///
/// Accepts a list of strings (non-string scalars are rendered, nested
/// containers are skipped) or a single comma-separated string. Entries are
/// trimmed, empty entries dropped, and the result sorted lexicographically.
/// Duplicates are kept; set semantics belong to the callers that need them.
pub fn to_string_list(shape: Shape<'_>) -> Vec<String> {
    let mut out: Vec<String> = match shape {
        Shape::List(items) => items
            .iter()
            .map(|item| to_text(Shape::of(Some(item))))
            .filter(|s| !s.is_empty())
            .collect(),
        Shape::Str(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    out.sort();
    out
}

/// Decode a shape as a list of records, skipping non-object elements.
pub fn to_records<'a>(shape: Shape<'a>) -> Vec<&'a Map<String, Value>> {
    shape
        .as_list()
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}
