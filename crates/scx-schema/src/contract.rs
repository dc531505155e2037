//! A loaded schema + profile pair for one version.

use serde_json::Value;

use crate::model::{Profile, Schema};
use crate::report::{validate_scenes, ValidationReport};
use crate::validate::{validate_scene, Violation};
use crate::version::SchemaVersion;

/// Everything needed to validate scenes of one schema version.
///
/// Immutable after loading; share one instance (e.g. behind an `Arc`)
/// across concurrent validations.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneContract {
    pub version: SchemaVersion,
    pub schema: Schema,
    pub profile: Profile,
}

impl SceneContract {
    /// Validate a single scene.
    pub fn validate(&self, scene: &Value) -> Vec<Violation> {
        validate_scene(scene, &self.schema, &self.profile)
    }

    /// Validate a whole payload.
    pub fn validate_all(&self, scenes: &[Value]) -> ValidationReport {
        validate_scenes(scenes, &self.schema, &self.profile)
    }
}
