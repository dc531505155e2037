//! Batch validation with per-scene aggregation.

use serde::Serialize;
use serde_json::Value;

use scx_core::shape::{to_text, Shape};

use crate::model::{Profile, Schema};
use crate::validate::{validate_scene, Violation, ViolationKind};

/// Violations collected for one scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneViolations {
    /// Scene code, falling back to `key`, then `#<index>` in the payload.
    pub scene: String,
    pub violations: Vec<Violation>,
}

/// Result of validating a whole scene payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Number of scenes validated.
    pub total: usize,
    /// Scenes with at least one violation, in payload order.
    pub failures: Vec<SceneViolations>,
}

impl ValidationReport {
    pub fn passed(&self) -> usize {
        self.total - self.failures.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total number of violations across all scenes.
    pub fn violation_count(&self) -> usize {
        self.failures.iter().map(|f| f.violations.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate every scene in a payload.
pub fn validate_scenes(scenes: &[Value], schema: &Schema, profile: &Profile) -> ValidationReport {
    let failures = scenes
        .iter()
        .enumerate()
        .filter_map(|(index, scene)| {
            let violations = if scene.is_object() {
                validate_scene(scene, schema, profile)
            } else {
                vec![Violation::new("scene", ViolationKind::ExpectedObject)]
            };
            (!violations.is_empty()).then(|| SceneViolations {
                scene: scene_label(scene, index),
                violations,
            })
        })
        .collect();

    ValidationReport {
        total: scenes.len(),
        failures,
    }
}

fn scene_label(scene: &Value, index: usize) -> String {
    ["code", "key"]
        .into_iter()
        .map(|field| to_text(Shape::field(scene, field)))
        .find(|label| !label.is_empty())
        .unwrap_or_else(|| format!("#{index}"))
}
