//! Scalar and array values carried by filters and bind parameters.
//!
//! The load-options grammar is untyped on the wire: a filter leaf may compare
//! against a string, a number, a date, or (for membership tests) a list of
//! any of those. `Value` is the tagged-union form of that grammar. JSON input
//! never produces the date variants (JSON has no date type); those are
//! constructed programmatically by callers that assemble filters in code.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A filter or bind-parameter value.
///
/// The untagged representation mirrors the JSON wire shape, so
/// `serde_json::from_value` turns a raw nested-array filter directly into a
/// `Value` tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Calendar date. Programmatic construction only; renders as a typed
    /// `DATE` literal when inlined.
    Date(NaiveDate),
    /// Date with time-of-day. Programmatic construction only; renders as a
    /// typed `TIMESTAMP` literal when inlined.
    Timestamp(NaiveDateTime),
    List(Vec<Value>),
}

impl Value {
    /// Borrow the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Timestamp(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
