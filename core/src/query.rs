//! Query-string encoding for resource calls.
//!
//! `QueryParams` is an ordered mapping from parameter name to an optional
//! scalar. Absent values stay in the mapping so that a later merge can still
//! override them, but they never reach the wire.

use std::fmt;

use serde_json::Value;
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::ApiError;

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(i) => write!(f, "{i}"),
            QueryValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(value.into())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Uuid> for QueryValue {
    fn from(value: Uuid) -> Self {
        QueryValue::Str(value.hyphenated().to_string())
    }
}

/// Ordered query parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an optional parameter. `None` is kept as absent and omitted
    /// from the encoded string.
    pub fn param<V: Into<QueryValue>>(mut self, key: &str, value: Option<V>) -> Self {
        self.set(key, value.map(Into::into));
        self
    }

    pub fn required<V: Into<QueryValue>>(self, key: &str, value: V) -> Self {
        self.param(key, Some(value))
    }

    /// Sets `key`, replacing an existing entry in place.
    pub fn set(&mut self, key: &str, value: Option<QueryValue>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Returns the present value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Present entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// True when no entry has a present value.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Merges `overrides` over `self`.
    ///
    /// A shared key takes the override's value, even when that value is
    /// absent. Base keys keep their position; override-only keys follow in
    /// override order.
    pub fn merge(&self, overrides: &QueryParams) -> QueryParams {
        let mut merged = self.clone();
        for (key, value) in &overrides.entries {
            merged.set(key, value.clone());
        }
        merged
    }

    /// Encodes as `?k=v&k2=v2`, or `""` when nothing is present.
    pub fn encode(&self) -> String {
        let pairs: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("{}={}", escape(k), escape(&v.to_string())))
            .collect();
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }

    /// Builds a parameter set from a JSON object of scalars.
    ///
    /// `null` members are absent. Array or object members are rejected with
    /// [`ApiError::InvalidQueryValue`]; nested structures have no query-string
    /// representation the service understands.
    pub fn try_from_json(value: &Value) -> Result<QueryParams, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::InvalidQueryValue {
                key: String::new(),
            });
        };
        let mut params = QueryParams::new();
        for (key, member) in map {
            let value = match member {
                Value::Null => None,
                Value::Bool(b) => Some(QueryValue::Bool(*b)),
                Value::Number(n) => Some(match n.as_i64() {
                    Some(i) => QueryValue::Int(i),
                    None => QueryValue::Str(n.to_string()),
                }),
                Value::String(s) => Some(QueryValue::Str(s.clone())),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ApiError::InvalidQueryValue { key: key.clone() });
                }
            };
            params.set(key, value);
        }
        Ok(params)
    }
}

fn escape(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
