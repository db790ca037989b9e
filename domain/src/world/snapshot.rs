//! Opaque snapshot and scratchpad values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured world state for one tick (agents, survivors, fires, rubble,
/// hospitals, depot).
///
/// The planner never mutates it. Serialization keeps the original key order
/// so that prompts embed the snapshot verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSnapshot(Value);

impl WorldSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Compact JSON text of the whole snapshot.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for WorldSnapshot {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Caller-owned running memory (e.g. prior validation errors) for strategies
/// that need history. Passed in per call, never stored by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scratchpad(Value);

impl Scratchpad {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Scratchpad listing previous failure reasons, oldest first.
    pub fn from_failures<I, S>(failures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reasons: Vec<Value> = failures
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect();
        Self(serde_json::json!({ "previous_errors": reasons }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// A null, empty-string, empty-array or empty-object scratchpad carries
    /// nothing worth embedding.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }

    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for Scratchpad {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
