//! # Canonical Bytes — JCS Rendering for Hashing
//!
//! `CanonicalBytes` is the sole construction path for bytes that feed a
//! snapshot digest. Canonical scenes are already sorted and default-filled
//! by [`crate::scene::canonicalize_scenes`]; this module fixes the byte-level
//! rendering (RFC 8785: sorted object keys, compact separators, normalized
//! number formatting) so the same canonical snapshot always hashes to the
//! same digest on every platform.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 (JCS) serialization.
///
/// # Invariants
///
/// - The only constructor is [`CanonicalBytes::new`].
/// - Object keys are sorted, separators compact, no trailing whitespace.
/// - The content is valid UTF-8 JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON, or `JcsFailed` if JCS rendering fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let text = serde_jcs::to_string(&value)
            .map_err(|e| CanonicalizationError::JcsFailed(e.to_string()))?;
        Ok(Self(text.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the bytes as text. JCS output is always UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorted_keys_compact_separators() {
        let cb = CanonicalBytes::new(&json!({"b": 2, "a": 1, "c": "hello"})).unwrap();
        assert_eq!(cb.as_str(), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn nested_objects_sorted_arrays_untouched() {
        let data = json!({"outer": {"b": 2, "a": 1}, "list": [3, 2, 1]});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_str(), r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn floats_are_accepted() {
        // Layouts may carry fractional widths.
        let cb = CanonicalBytes::new(&json!({"width": 0.5})).unwrap();
        assert_eq!(cb.as_str(), r#"{"width":0.5}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(CanonicalBytes::new(&json!({})).unwrap().as_bytes(), b"{}");
        assert_eq!(CanonicalBytes::new(&json!([])).unwrap().as_bytes(), b"[]");
    }

    #[test]
    fn unicode_passes_through_unescaped() {
        let cb = CanonicalBytes::new(&json!({"name": "\u{00e9}t\u{00e9}"})).unwrap();
        assert!(cb.as_str().contains('\u{00e9}'));
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), cb.as_bytes().len());
    }
}
