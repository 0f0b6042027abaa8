//! Helpers for reading loosely-typed JSON values
//!
//! Brief fields arrive with whatever types the client chose. These helpers
//! decide whether a value counts as set and how it renders as text.

use serde_json::Value;

/// Whether a value counts as set.
///
/// `null`, `false`, zero, and empty strings, arrays and objects are unset.
#[must_use]
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a value as text; `None` for `null`.
///
/// Strings render bare, everything else as compact JSON.
#[must_use]
pub fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Render a value for echoing back to the client.
#[must_use]
pub fn echo_text(value: &Value) -> String {
    render_text(value).unwrap_or_else(|| Value::Null.to_string())
}
