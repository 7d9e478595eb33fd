//! Query parameters for API calls and their URL encoding.
//!
//! HasOffers reads nested parameters in bracket notation, so a [`Query`] such as
//! `{"filters": {"status": "active"}}` is sent as `filters[status]=active`. Lists are
//! flattened with their index (`ids[0]=1&ids[1]=2`). Entries are emitted in insertion
//! order.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded::byte_serialize;

use crate::Result;
use crate::error::Error;

/// Ordered mapping of API parameters.
///
/// Values are any JSON value: scalars are sent as-is, objects and arrays are flattened
/// in bracket notation and `null` entries are skipped.
///
/// ```
/// use hasoffers_client_sdk::query::Query;
/// use serde_json::json;
///
/// let query = Query::new()
///     .with("filters", json!({ "status": "active" }))
///     .with("fields", json!(["id", "name"]));
///
/// assert_eq!(
///     query.to_query_string(),
///     "filters[status]=active&fields[0]=id&fields[1]=name"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Map<String, Value>);

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value in place.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Deep-merges `other` into `self`. Nested objects are merged key by key, anything
    /// else in `other` replaces the existing value.
    pub fn merge(&mut self, other: Query) {
        deep_merge(&mut self.0, other.0);
    }

    /// URL-encodes the query. Keys and values are percent-encoded, the brackets joining
    /// nested keys are left literal.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            append_pair(&mut out, &encode(key), value);
        }
        out
    }
}

impl From<Map<String, Value>> for Query {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Query> for Map<String, Value> {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Trait for converting request types to a [`Query`].
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// The type must serialize to a JSON object (or `null`, which yields an empty query).
pub trait ToQuery: Serialize {
    fn to_query(&self) -> Result<Query> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(Query(map)),
            Value::Null => Ok(Query::default()),
            other => Err(Error::validation(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
        }
    }
}

impl<T: Serialize> ToQuery for T {}

/// Merges `source` into `target`. Objects present on both sides merge recursively,
/// every other value from `source` wins.
pub(crate) fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        match (target.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}

fn append_pair(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (child, value) in map {
                append_pair(out, &format!("{key}[{}]", encode(child)), value);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                append_pair(out, &format!("{key}[{index}]"), value);
            }
        }
        Value::Bool(flag) => push(out, key, if *flag { "1" } else { "0" }),
        Value::Number(number) => push(out, key, &number.to_string()),
        Value::String(text) => push(out, key, &encode(text)),
    }
}

fn push(out: &mut String, key: &str, encoded_value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    let _ = write!(out, "{key}={encoded_value}");
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}
