//! Color utilities for variable values
//!
//! Design tools store colors with normalized channels in `[0, 1]`. This module
//! converts them to display strings:
//! - `#RRGGBB` when the color is fully opaque
//! - `#RRGGBBAA` otherwise

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An RGBA color with normalized `f64` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Create a color from normalized channels
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Best-effort extraction of a color from an arbitrary JSON value.
    ///
    /// Any object exposing numeric `r`, `g`, `b` and `a` members is treated as a
    /// color. Extra members are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use varsheet::color::Rgba;
    /// use serde_json::json;
    ///
    /// let c = Rgba::from_json(&json!({"r": 1, "g": 0, "b": 0, "a": 1})).unwrap();
    /// assert_eq!(c, Rgba::opaque(1.0, 0.0, 0.0));
    /// assert!(Rgba::from_json(&json!({"r": 1, "g": 0})).is_none());
    /// ```
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let channel = |key: &str| obj.get(key).and_then(Value::as_f64);
        Some(Self { r: channel("r")?, g: channel("g")?, b: channel("b")?, a: channel("a")? })
    }

    /// Whether the alpha channel is fully opaque after clamping
    pub fn is_opaque(&self) -> bool {
        clamp01(self.a) >= 1.0
    }

    /// Channels scaled to 0..=255
    pub fn to_u8(&self) -> [u8; 4] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a)]
    }
}

/// Convert a normalized color to an uppercase hex string.
///
/// Channels outside `[0, 1]` are clamped, never rejected. The alpha suffix is
/// only appended for translucent colors.
///
/// # Examples
///
/// ```
/// use varsheet::color::{to_display_hex, Rgba};
///
/// assert_eq!(to_display_hex(&Rgba::new(1.0, 0.0, 0.0, 1.0)), "#FF0000");
/// assert_eq!(to_display_hex(&Rgba::new(0.0, 0.0, 1.0, 0.5)), "#0000FF80");
/// ```
pub fn to_display_hex(color: &Rgba) -> String {
    let [r, g, b, a] = color.to_u8();
    if color.is_opaque() {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Clamp a channel to `[0, 1]`; NaN clamps to 0
fn clamp01(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.clamp(0.0, 1.0)
    }
}

fn to_byte(n: f64) -> u8 {
    (clamp01(n) * 255.0).round() as u8
}
