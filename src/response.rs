use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope is the uniform wrapper around every Cloudbeds API response.
/// `success` decides the outcome; the HTTP status alone is never trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// A missing flag counts as failure
    #[serde(default)]
    pub success: bool,

    /// Response data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Number of items in this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Total number of items across all pages, when the endpoint reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl Envelope {
    /// Get the raw data value from the response
    pub fn raw(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Apply unmarshals the response data into the provided type
    pub fn apply<T>(&self) -> Result<T, crate::error::RestError>
    where
        T: serde::de::DeserializeOwned,
    {
        match &self.data {
            Some(data) => serde_json::from_value(data.clone()).map_err(|e| e.into()),
            None => serde_json::from_value(Value::Null).map_err(|e| e.into()),
        }
    }

    /// Get a value from the response data by a slash-separated path.
    /// For example, "0/roomID" reads `roomID` of the first element of an array payload.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.data.as_ref()?;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value from the response data by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    /// Flatten the envelope into output items.
    ///
    /// Uses `data` when it carries a value, otherwise the whole envelope.
    /// An array yields one item per element, anything else a single item.
    pub fn into_items(mut self) -> Vec<Value> {
        let payload = match self.data.take() {
            Some(data) if is_truthy(&data) => data,
            data => {
                self.data = data;
                serde_json::to_value(&self).unwrap_or(Value::Null)
            }
        };

        match payload {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}

// Mirrors how the upstream treats a `data` field that is present but empty-ish
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
