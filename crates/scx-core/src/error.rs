//! # Error Types
//!
//! Canonicalization of scene descriptors is total and never errors; the
//! only fallible path in this crate is producing JCS bytes for hashing.
//! All errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Top-level error type for the scene contract engine.
#[derive(Error, Debug)]
pub enum ScxError {
    /// Canonical byte production failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted to a JSON tree.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// The JSON tree could not be rendered as RFC 8785 text.
    #[error("JCS rendering failed: {0}")]
    JcsFailed(String),
}
