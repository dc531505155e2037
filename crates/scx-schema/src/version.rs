//! Schema version tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A supported scene schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    /// Version used when a caller supplies nothing recognizable.
    pub const DEFAULT: SchemaVersion = SchemaVersion::V1;

    /// Normalize a raw version token.
    ///
    /// Accepts `v1`, `v2`, `1`, `2` case-insensitively (surrounding
    /// whitespace ignored). Anything else, including `None`, yields
    /// `fallback`.
    pub fn normalize(raw: Option<&str>, fallback: SchemaVersion) -> SchemaVersion {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("v1" | "1") => SchemaVersion::V1,
            Some("v2" | "2") => SchemaVersion::V2,
            _ => fallback,
        }
    }

    /// Canonical token, `v1` or `v2`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }

    /// Schema file name for this version.
    pub fn schema_file(&self) -> String {
        format!("scene_schema_{}.json", self.as_str())
    }

    /// Profile file name for this version.
    pub fn profile_file(&self) -> String {
        format!("scene_profiles_{}.json", self.as_str())
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
