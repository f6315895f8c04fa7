//! The stored-value union.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UnsupportedTypeError;

/// A value stored under a key: the closed union of native shapes.
///
/// Absence is first-class and is not a `Value` — reads yield
/// `Option<Value>`, and a missing or type-mismatched key is `None`,
/// never an error. Structured data is not natively supported; it rides
/// the string shape as serialized JSON (see the store's JSON accessors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// The name of this value's native shape, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
        }
    }

    /// Narrow to a boolean. `None` for any other shape.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Narrow to a number. `None` for any other shape.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Narrow to a string slice. `None` for any other shape.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Consume into the string shape. `None` for any other shape.
    #[must_use]
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a dynamic JSON value into the native union.
    ///
    /// `Null`, arrays, and objects are outside the union and fail with
    /// [`UnsupportedTypeError`]. Callers that treat `Null` as deletion
    /// must branch before converting (the store's dynamic write path
    /// does exactly that).
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedTypeError`] naming the offending shape.
    pub fn from_json(json: serde_json::Value) -> Result<Self, UnsupportedTypeError> {
        match json {
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| UnsupportedTypeError::new("number")),
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Null => Err(UnsupportedTypeError::new("null")),
            serde_json::Value::Array(_) => Err(UnsupportedTypeError::new("array")),
            serde_json::Value::Object(_) => Err(UnsupportedTypeError::new("object")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s),
        }
    }
}
