//! Variable and collection types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::core::VariableValue;

/// A named design token with per-mode values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub variable_collection_id: String,
    /// Mode id -> value. Explicit `null` entries are dropped on load.
    #[serde(default, deserialize_with = "deserialize_values_by_mode")]
    pub values_by_mode: HashMap<String, VariableValue>,
}

impl Variable {
    /// Create a variable with no values
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variable_collection_id: collection_id.into(),
            values_by_mode: HashMap::new(),
        }
    }

    /// Builder-style helper to set a mode value
    pub fn with_value(mut self, mode_id: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        self.values_by_mode.insert(mode_id.into(), value.into());
        self
    }

    /// The value stored for a mode, without any fallback
    pub fn value_for(&self, mode_id: &str) -> Option<&VariableValue> {
        self.values_by_mode.get(mode_id)
    }
}

/// A named dimension within a collection (e.g. Light/Dark)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// The host calls this `modeId`
    #[serde(alias = "modeId")]
    pub id: String,
    pub name: String,
}

impl Mode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A named set of variables sharing a list of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub default_mode_id: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
}

impl Collection {
    /// Fallback title for collections with an empty name
    pub const UNTITLED: &'static str = "Untitled Collection";

    /// Create a collection whose default mode is the first of `modes`
    pub fn new(id: impl Into<String>, name: impl Into<String>, modes: Vec<Mode>) -> Self {
        let default_mode_id = modes.first().map(|m| m.id.clone()).unwrap_or_default();
        Self { id: id.into(), name: name.into(), default_mode_id, modes }
    }

    /// Name for display, never empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            Self::UNTITLED
        } else {
            &self.name
        }
    }
}

fn deserialize_values_by_mode<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, VariableValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Value> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, VariableValue::from(v)))
        .collect())
}
