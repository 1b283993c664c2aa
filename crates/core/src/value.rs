//! Dot-path resolution and scalar coercion over JSON payloads.
//!
//! Conditions and templates address event payload fields by dot path
//! (e.g. `"material.unit"`). Resolution of a missing key at any depth
//! yields absent, never an error, so a mistyped path degrades to a
//! non-matching condition or a verbatim placeholder.

use serde_json::Value;

/// Resolve a dot-separated path into a JSON payload.
///
/// Returns `None` when any segment is missing or an intermediate value
/// is not an object.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Coerce a JSON value to a number for ordered comparisons.
///
/// Strings are trimmed and parsed, booleans map to 1/0. Null, arrays,
/// objects, and non-numeric strings have no numeric form; ordered
/// comparisons involving them never match.
pub fn coerce_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Render a JSON value as a plain string.
///
/// Strings render bare (no JSON quoting), integral numbers render
/// without a decimal point, and arrays/objects render as compact JSON.
/// The same value always renders the same string.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            match n.as_f64() {
                // Integral doubles print as integers, the way payload
                // builders and trigger authors expect ("30", not "30.0").
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                    format!("{}", f as i64)
                }
                _ => n.to_string(),
            }
        }
        other => other.to_string(),
    }
}

/// Loosely compare two JSON values the way trigger authors expect.
///
/// When both sides have a numeric form the numbers are compared
/// (`"5"` equals `5`); otherwise the lower-cased string forms are
/// compared. Null equals only null.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    if a.is_null() || b.is_null() {
        return a.is_null() && b.is_null();
    }
    if let (Some(x), Some(y)) = (coerce_to_number(a), coerce_to_number(b)) {
        return x == y;
    }
    coerce_to_string(a).to_lowercase() == coerce_to_string(b).to_lowercase()
}
