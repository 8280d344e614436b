//! Core value type shared by variables across modes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::color::Rgba;

/// The `type` tag the host uses for alias values
pub const ALIAS_TYPE: &str = "VARIABLE_ALIAS";

/// A variable's value for one mode: either a concrete value or an alias to
/// another variable.
///
/// Deserialized from the host's loosely-typed JSON shape. Anything that is not
/// a number, string, boolean, color or alias lands in [`VariableValue::Other`].
///
/// # Examples
///
/// ```
/// use varsheet::models::VariableValue;
///
/// let alias: VariableValue =
///     serde_json::from_str(r#"{"type": "VARIABLE_ALIAS", "id": "VariableID:1:2"}"#).unwrap();
/// assert_eq!(alias.alias_target(), Some("VariableID:1:2"));
///
/// let color: VariableValue = serde_json::from_str(r#"{"r": 1, "g": 0, "b": 0, "a": 1}"#).unwrap();
/// assert!(color.as_color().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum VariableValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Color(Rgba),
    /// Reference to another variable by id
    Alias { id: String },
    /// Any other shape, kept verbatim
    Other(Value),
}

impl VariableValue {
    /// Construct an alias value
    pub fn alias(id: impl Into<String>) -> Self {
        VariableValue::Alias { id: id.into() }
    }

    /// Returns true if this value references another variable
    pub fn is_alias(&self) -> bool {
        matches!(self, VariableValue::Alias { .. })
    }

    /// Returns the alias target id if this is an alias
    pub fn alias_target(&self) -> Option<&str> {
        match self {
            VariableValue::Alias { id } => Some(id),
            _ => None,
        }
    }

    /// Returns the color if this is a color value
    pub fn as_color(&self) -> Option<&Rgba> {
        match self {
            VariableValue::Color(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Value> for VariableValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => VariableValue::Boolean(b),
            Value::String(s) => VariableValue::String(s),
            Value::Number(ref n) => match n.as_f64() {
                Some(f) => VariableValue::Number(f),
                None => VariableValue::Other(value),
            },
            Value::Object(ref obj) => {
                if let Some(id) = alias_id(obj) {
                    return VariableValue::Alias { id };
                }
                match Rgba::from_json(&value) {
                    Some(color) => VariableValue::Color(color),
                    None => VariableValue::Other(value),
                }
            }
            other => VariableValue::Other(other),
        }
    }
}

impl From<VariableValue> for Value {
    fn from(value: VariableValue) -> Self {
        match value {
            VariableValue::Number(n) => json!(n),
            VariableValue::String(s) => Value::String(s),
            VariableValue::Boolean(b) => Value::Bool(b),
            VariableValue::Color(c) => json!({ "r": c.r, "g": c.g, "b": c.b, "a": c.a }),
            VariableValue::Alias { id } => json!({ "type": ALIAS_TYPE, "id": id }),
            VariableValue::Other(v) => v,
        }
    }
}

impl From<f64> for VariableValue {
    fn from(n: f64) -> Self {
        VariableValue::Number(n)
    }
}

impl From<bool> for VariableValue {
    fn from(b: bool) -> Self {
        VariableValue::Boolean(b)
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        VariableValue::String(s.to_string())
    }
}

impl From<Rgba> for VariableValue {
    fn from(c: Rgba) -> Self {
        VariableValue::Color(c)
    }
}

fn alias_id(obj: &Map<String, Value>) -> Option<String> {
    if obj.get("type").and_then(Value::as_str) != Some(ALIAS_TYPE) {
        return None;
    }
    obj.get("id").and_then(Value::as_str).map(str::to_string)
}
