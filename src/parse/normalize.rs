//! Boundary normalization of the loosely-shaped parts of node payloads.
//!
//! The editor and the importers disagree on how headers, bodies and scalar
//! fields are encoded (objects vs. JSON strings vs. `{key, value}` rows,
//! numbers vs. numeric strings). Everything is folded into one canonical
//! representation here so the emitter never inspects raw JSON shapes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// =============================================================================
// KEY/VALUE LISTS (headers, query params, form fields)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

/// Canonical header-like list. Malformed input is kept with a reason instead of
/// failing the whole payload, so the emitter can diagnose just that part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValues {
    List(Vec<KeyValue>),
    Malformed(String),
}

impl Default for KeyValues {
    fn default() -> Self {
        KeyValues::List(Vec::new())
    }
}

impl KeyValues {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => KeyValues::default(),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return KeyValues::default();
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(inner @ (Value::Object(_) | Value::Array(_))) => KeyValues::from_value(&inner),
                    Ok(_) => KeyValues::Malformed("expected a JSON object or array".into()),
                    Err(e) => KeyValues::Malformed(format!("could not parse JSON: {}", e)),
                }
            }
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, v) in map {
                    match scalar_text(v) {
                        Some(text) => entries.push(KeyValue {
                            key: key.clone(),
                            value: text,
                        }),
                        None => {
                            return KeyValues::Malformed(format!("value of '{}' is not a scalar", key));
                        }
                    }
                }
                KeyValues::List(entries)
            }
            Value::Array(rows) => {
                let mut entries = Vec::with_capacity(rows.len());
                for row in rows {
                    let Value::Object(row) = row else {
                        return KeyValues::Malformed("expected rows of {key, value}".into());
                    };
                    if row.get("enabled") == Some(&Value::Bool(false)) {
                        continue;
                    }
                    let key = row.get("key").and_then(scalar_text).unwrap_or_default();
                    if key.trim().is_empty() {
                        continue;
                    }
                    let Some(value) = row.get("value").map_or(Some(String::new()), scalar_text) else {
                        return KeyValues::Malformed(format!("value of '{}' is not a scalar", key));
                    };
                    entries.push(KeyValue { key, value });
                }
                KeyValues::List(entries)
            }
            Value::Bool(_) | Value::Number(_) => {
                KeyValues::Malformed("expected an object, an array of rows or a JSON string".into())
            }
        }
    }
}

impl<'de> Deserialize<'de> for KeyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(KeyValues::from_value(&value))
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

// =============================================================================
// REQUEST BODY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Json,
    Form,
    Text,
}

impl BodyType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "json" | "application/json" | "raw-json" | "structured" => Some(BodyType::Json),
            "form" | "form-urlencoded" | "x-www-form-urlencoded" | "application/x-www-form-urlencoded"
            | "urlencoded" => Some(BodyType::Form),
            "text" | "raw" | "plain" | "text/plain" => Some(BodyType::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Form(Vec<KeyValue>),
    Text(String),
    Malformed(String),
}

impl Body {
    /// Fold a raw body and its declared type into one canonical body.
    /// Returns `None` when no body was supplied.
    pub fn normalize(raw: Option<&Value>, body_type: Option<&str>) -> Option<Body> {
        let raw = match raw {
            None | Some(Value::Null) => return None,
            Some(Value::String(s)) if s.trim().is_empty() => return None,
            Some(v) => v,
        };

        let Some(kind) = BodyType::from_name(body_type.unwrap_or("json")) else {
            return Some(Body::Malformed(format!(
                "unsupported body type '{}'",
                body_type.unwrap_or_default()
            )));
        };

        let body = match (kind, raw) {
            (BodyType::Json, Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(v) => Body::Json(v),
                Err(e) => Body::Malformed(format!("body is not valid JSON: {}", e)),
            },
            (BodyType::Json, v) => Body::Json(v.clone()),
            (BodyType::Form, Value::String(s)) if !s.trim_start().starts_with(['{', '[']) => {
                Body::Form(parse_form_pairs(s))
            }
            (BodyType::Form, v) => match KeyValues::from_value(v) {
                KeyValues::List(entries) => Body::Form(entries),
                KeyValues::Malformed(reason) => Body::Malformed(format!("form body: {}", reason)),
            },
            (BodyType::Text, Value::String(s)) => Body::Text(s.clone()),
            (BodyType::Text, v) => Body::Text(v.to_string()),
        };
        Some(body)
    }
}

/// `a=1&b=2` into ordered pairs. Percent-decoding is left to the runner.
fn parse_form_pairs(raw: &str) -> Vec<KeyValue> {
    raw.split('&')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => KeyValue {
                key: k.trim().to_string(),
                value: v.to_string(),
            },
            None => KeyValue {
                key: pair.trim().to_string(),
                value: String::new(),
            },
        })
        .collect()
}

// =============================================================================
// SCALAR FIELDS
// =============================================================================

/// Strings, numbers and booleans are accepted as text; blank text is absent.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text, found {}",
            json_kind(&other)
        ))),
    }
}

/// Non-negative integers given either as numbers or numeric strings.
pub fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not a whole number", s))),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("{} is not a whole number", n))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a number, found {}",
            json_kind(&other)
        ))),
    }
}

/// Any JSON literal; `null` and blank strings count as absent.
pub fn optional_literal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    })
}

/// Schema documents may arrive as objects or as JSON text.
pub fn json_document<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    let value = optional_literal(deserializer)?;
    match value {
        Some(Value::String(s)) => serde_json::from_str::<Value>(&s)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("schema is not valid JSON: {}", e))),
        other => Ok(other),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
