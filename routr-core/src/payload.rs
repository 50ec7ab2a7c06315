//! Request payloads and per-call options.

use serde_json::{Map, Value};

/// Payload key holding the `lon,lat` coordinate list.
pub const COORDINATES: &str = "coordinates";

/// Ordered request parameters.
///
/// Entries keep insertion order so query strings are reproducible.
/// Inserting an existing key replaces its value in place.
///
/// # Examples
///
/// ```
/// use routr_core::{COORDINATES, Payload};
///
/// let payload = Payload::new()
///     .with(COORDINATES, vec!["1.0,2.0", "3.0,4.0"])
///     .with("overview", "false");
/// assert_eq!(payload.len(), 2);
/// assert!(payload.get(COORDINATES).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: Vec<(String, Value)>,
}

impl Payload {
    /// An empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style [`Payload::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the payload has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Serialise as a JSON object for request bodies.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self.entries.iter().cloned().collect();
        Value::Object(object)
    }
}

/// HTTP method used by a routing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Payload travels as query parameters.
    #[default]
    Get,
    /// Payload travels as a JSON body.
    Post,
}

/// Per-call options: method, path override and extra headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Request path for clients that do not derive one from the payload.
    /// Service-scoped clients ignore it.
    pub path: Option<String>,
    /// Headers merged over the client's defaults; these win on collision.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options for a POST call.
    #[must_use]
    pub fn post() -> Self {
        Self {
            method: Method::Post,
            ..Self::default()
        }
    }

    /// Set the path override.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
