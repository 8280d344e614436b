//! Display formatting for resolved variable values
//!
//! Every value shape has a canonical string form. Formatting never fails:
//! shapes without a clean representation degrade to compact JSON.

use crate::color::to_display_hex;
use crate::models::VariableValue;

/// Placeholder for a missing value
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Convert a resolved value into its display string.
///
/// # Examples
///
/// ```
/// use varsheet::format::format_value;
/// use varsheet::models::VariableValue;
///
/// assert_eq!(format_value(None), "—");
/// assert_eq!(format_value(Some(&VariableValue::Boolean(true))), "true");
/// assert_eq!(format_value(Some(&VariableValue::Number(3.5))), "3.5");
/// assert_eq!(format_value(Some(&VariableValue::Number(16.0))), "16");
/// ```
pub fn format_value(value: Option<&VariableValue>) -> String {
    let value = match value {
        Some(v) => v,
        None => return EMPTY_PLACEHOLDER.to_string(),
    };

    match value {
        VariableValue::Color(c) => to_display_hex(c),
        VariableValue::Number(n) => format_number(*n),
        VariableValue::String(s) => s.clone(),
        VariableValue::Boolean(b) => b.to_string(),
        VariableValue::Alias { id } => format!("${}", id),
        VariableValue::Other(v) => {
            serde_json::to_string(v).unwrap_or_else(|_| format!("{:?}", v))
        }
    }
}

/// Format a number the way a script host prints it: shortest round-trip
/// digits, integral values without a fractional part, and exponent form
/// (`1e-7`, `1e+21`) below `1e-6` and from `1e21` up.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if n == 0.0 {
        // -0 too
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", n);
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}
