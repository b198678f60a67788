//! Rendering of values and paths into Karate expression syntax.

use serde_json::{Map, Value};

/// Single-quoted string literal, escaped so it stays on one line.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// Any JSON value as a Karate literal. Strings are single-quoted; objects and
/// arrays are embedded as compact JSON, which Karate reads natively.
pub fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Null => "null".into(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Ordered key/value pairs as a compact JSON object. A repeated key keeps its
/// first position and its last value.
pub fn json_object<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let fields: Map<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Value::Object(fields).to_string()
}

/// Map a JSONPath-ish field reference onto the `response` variable.
pub fn response_path(path: &str) -> String {
    let path = path.trim();
    if path == "$" || path.is_empty() {
        return "response".into();
    }
    if let Some(rest) = path.strip_prefix('$') {
        return format!("response{}", rest);
    }
    if path == "response" || path.starts_with("response.") || path.starts_with("response[") {
        return path.to_string();
    }
    if path.starts_with('[') {
        return format!("response{}", path);
    }
    format!("response.{}", path)
}
