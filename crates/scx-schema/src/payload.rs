//! # Scene Payload Loading
//!
//! Audit tooling feeds the engine either a live response saved to disk or
//! an exported snapshot. Both are JSON (or YAML, for hand-maintained
//! fixtures) and carry the scenes either as the top-level array or under a
//! `scenes` key, possibly wrapped in an RPC `result` envelope.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Error loading a scene payload file.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("cannot read payload '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {reason}", .path.display())]
    Json { path: PathBuf, reason: String },

    #[error("invalid YAML in '{}': {reason}", .path.display())]
    Yaml { path: PathBuf, reason: String },
}

/// Read a payload file and return its scene list.
pub fn load_scene_payload(path: &Path) -> Result<Vec<Value>, PayloadError> {
    Ok(extract_scenes(read_document(path)?))
}

/// Read a JSON or YAML document, chosen by file extension.
pub fn read_document(path: &Path) -> Result<Value, PayloadError> {
    let content = std::fs::read_to_string(path).map_err(|source| PayloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        // Scenes are JSON-shaped; YAML payloads deserialize straight into that model.
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| PayloadError::Yaml {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        _ => serde_json::from_str(&content).map_err(|e| PayloadError::Json {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Pull the scene list out of a payload document.
///
/// Accepts a top-level array, `{"scenes": [...]}`, or
/// `{"result": {"scenes": [...]}}`. Anything else yields an empty list.
pub fn extract_scenes(document: Value) -> Vec<Value> {
    match document {
        Value::Array(scenes) => scenes,
        Value::Object(mut map) => {
            if let Some(Value::Array(scenes)) = map.remove("scenes") {
                return scenes;
            }
            if let Some(Value::Object(mut result)) = map.remove("result") {
                if let Some(Value::Array(scenes)) = result.remove("scenes") {
                    return scenes;
                }
            }
            warn!("payload object carries no scenes array");
            Vec::new()
        }
        other => {
            warn!(kind = json_kind(&other), "payload is neither an array nor an object");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
