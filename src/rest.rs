use crate::client::{create_rest_client, Config};
use crate::credential::Credential;
use crate::error::{RestError, Result};
use crate::request::{Query, Request};
use crate::response::Envelope;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// Client for the Cloudbeds API.
///
/// Holds configuration, one credential and a pooled transport. Every call is
/// independent: nothing is remembered between requests.
#[derive(Clone)]
pub struct CloudbedsClient {
    transport: Arc<dyn HttpTransport>,
    config: Config,
    credential: Credential,
}

impl CloudbedsClient {
    /// Create a client with the default configuration
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(credential, Config::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(credential: Credential, config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(create_rest_client(&config)?);
        Ok(Self::with_transport(credential, config, Arc::new(transport)))
    }

    /// Create a client on top of an existing transport
    pub fn with_transport(
        credential: Credential,
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        if config.announce {
            info!(base_url = %config.base_url(), "Cloudbeds client ready");
        }

        CloudbedsClient {
            transport,
            config,
            credential,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Execute one API call and return the successful envelope
    ///
    /// # Returns
    /// The envelope unchanged when it reports `success: true`; an
    /// [`RestError::Api`] when it reports `success: false`; a
    /// [`RestError::Transport`] when no envelope could be obtained.
    pub fn request(&self, request: &Request) -> Result<Envelope> {
        let http_request = self.build(request)?;

        let start = Instant::now();
        let response = self.transport.execute(&http_request)?;
        let status = response.status;

        debug!(
            method = %request.method,
            endpoint = %request.endpoint,
            status,
            elapsed = ?start.elapsed(),
            "cloudbeds request completed"
        );

        let envelope = parse_envelope(&response).map_err(|e| {
            if response.is_success() {
                RestError::transport(
                    format!("unparseable response body: {}", e),
                    Some(status),
                    Some(Box::new(e)),
                )
            } else {
                RestError::transport(
                    format!("HTTP {}: {}", status, String::from_utf8_lossy(&response.body)),
                    Some(status),
                    Some(Box::new(e)),
                )
            }
        })?;

        if !envelope.success {
            return Err(RestError::from_envelope(&envelope));
        }

        if !response.is_success() {
            return Err(RestError::transport(
                format!("HTTP {} with a successful envelope", status),
                Some(status),
                None,
            ));
        }

        Ok(envelope)
    }

    /// Execute one API call and unmarshal its `data` into the target type
    pub fn apply<T>(&self, request: &Request) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(request)?.apply()
    }

    pub fn get(&self, endpoint: &str, query: Query) -> Result<Envelope> {
        self.request(&Request::get(endpoint).with_query(query))
    }

    pub fn post(&self, endpoint: &str, body: Value) -> Result<Envelope> {
        self.request(&Request::post(endpoint).with_body(body))
    }

    pub fn put(&self, endpoint: &str, body: Value) -> Result<Envelope> {
        self.request(&Request::put(endpoint).with_body(body))
    }

    pub fn delete(&self, endpoint: &str, body: Value) -> Result<Envelope> {
        self.request(&Request::delete(endpoint).with_body(body))
    }

    /// Resolve URL, headers and body for a request
    fn build(&self, request: &Request) -> Result<HttpRequest> {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url(), request.endpoint))?;

        let pairs = request.query.sanitized();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = match request.body {
            Some(ref body) => Some(
                serde_json::to_vec(body)
                    .map_err(|e| RestError::validation(format!("invalid request body: {}", e)))?,
            ),
            None => None,
        };

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), self.credential.authorization()),
        ];

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }
}

// Only a JSON object is an envelope; derived struct deserialization would
// also accept arrays.
fn parse_envelope(response: &HttpResponse) -> serde_json::Result<Envelope> {
    match serde_json::from_slice::<Value>(&response.body)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        other => Err(serde::de::Error::custom(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
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

impl fmt::Debug for CloudbedsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudbedsClient")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
