//! Scene configuration and per-scene counters.

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::paint::SerializableColor;

/// Tunables for a scene. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertex count for new ellipses.
    pub ellipse_resolution: usize,
    /// Vertices per arc for new arc segments.
    pub arc_resolution: usize,
    /// Prefix of generated element ids.
    pub id_prefix: String,
    /// Tolerance for scene-level multivector comparisons.
    pub epsilon: f64,
    /// Fill of new shapes.
    pub fill: Option<SerializableColor>,
    /// Stroke of new shapes.
    pub stroke: Option<SerializableColor>,
    /// Stroke width of new shapes.
    pub linewidth: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ellipse_resolution: 4,
            arc_resolution: 24,
            id_prefix: "sg".to_string(),
            epsilon: crate::algebra::EPSILON,
            fill: Some(SerializableColor::white()),
            stroke: Some(SerializableColor::black()),
            linewidth: 1.0,
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Identifier and stop counters owned by one scene.
#[derive(Debug, Clone, Default)]
pub struct SceneContext {
    config: SceneConfig,
    next_id: u64,
    next_stop: usize,
}

impl SceneContext {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            next_id: 0,
            next_stop: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Issue a fresh id, e.g. `sg-ellipse-3`.
    pub fn next_id(&mut self, kind: &str) -> ElementId {
        self.next_id += 1;
        ElementId::new(format!("{}-{}-{}", self.config.id_prefix, kind, self.next_id))
    }

    /// Issue the index of a new gradient stop.
    pub fn next_stop_index(&mut self) -> usize {
        let index = self.next_stop;
        self.next_stop += 1;
        index
    }
}
