// src/world/poi.rs v1
//! Points of interest shown as markers in the viewer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SIGN: &str = "sign";
pub const SPAWN: &str = "spawn";

/// A marker record: a `type` tag plus free-form attributes (coordinates, text, ...).
///
/// Attributes keep their insertion order so markers.js stays stable between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Poi {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn sign(x: i64, y: i64, z: i64, msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        Self::new(SIGN)
            .with("x", x)
            .with("y", y)
            .with("z", z)
            .with("msg", msg)
    }

    pub fn spawn(coords: [i64; 3]) -> Self {
        Self::new(SPAWN)
            .with("x", coords[0])
            .with("y", coords[1])
            .with("z", coords[2])
            .with("msg", "Spawn")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn is_sign(&self) -> bool {
        self.kind == SIGN
    }

    pub fn is_spawn(&self) -> bool {
        self.kind == SPAWN
    }
}
