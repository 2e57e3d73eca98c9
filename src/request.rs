use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP methods accepted by the Cloudbeds API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Query parameters in insertion order.
///
/// Values are JSON scalars; `null` stands for an unset parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Query(IndexMap<String, Value>);

impl Query {
    pub fn new() -> Self {
        Query(IndexMap::new())
    }

    /// Insert or replace a parameter, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`Query::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert an optional parameter; `None` is kept as unset and never sent
    pub fn with_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.0
            .insert(key.into(), value.map_or(Value::Null, Into::into));
        self
    }

    /// Copy every entry of `other` over this query
    pub fn merge(&mut self, other: &Query) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The pairs actually transmitted: unset and empty-string values are
    /// dropped, everything else (including `0` and `false`) is rendered as text.
    pub fn sanitized(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(key, value)| render(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // Non-scalars have no natural query form; send their JSON text
        other => Some(other.to_string()),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Query(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, Value>> for Query {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// A single logical API call
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub endpoint: String,
    pub body: Option<Value>,
    pub query: Query,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Request {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: Query::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Request::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Request::new(Method::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Request::new(Method::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Request::new(Method::Delete, endpoint)
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Add a single query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}
