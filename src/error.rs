use crate::response::Envelope;
use thiserror::Error;

/// Fallback message when a failed envelope carries none
pub const DEFAULT_API_MESSAGE: &str = "Unknown API error";

/// Fallback description when a failed envelope carries no `errors`
pub const DEFAULT_API_DETAIL: &str = "no additional detail";

/// Main error type for Cloudbeds API operations
#[derive(Debug, Error)]
pub enum RestError {
    /// Connection failure, timeout, or a response that could not be understood
    #[error("Cloudbeds API request failed: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Well-formed envelope reporting `success: false`
    #[error("Cloudbeds API error: {message} ({description})")]
    Api { message: String, description: String },

    /// Caller-side precondition failure, detected before any network call
    #[error("invalid request: {0}")]
    Validation(String),
}

impl RestError {
    /// Create an API error from a failed envelope
    pub fn from_envelope(envelope: &Envelope) -> Self {
        let message = envelope
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_API_MESSAGE.to_string());

        let description = envelope
            .errors
            .as_ref()
            .filter(|e| !e.is_empty())
            .map(|e| e.join(", "))
            .unwrap_or_else(|| DEFAULT_API_DETAIL.to_string());

        RestError::Api {
            message,
            description,
        }
    }

    /// Create a transport error
    pub fn transport(
        message: impl Into<String>,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        RestError::Transport {
            message: message.into(),
            status,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        RestError::Validation(message.into())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RestError::Transport { .. })
    }

    pub fn is_api(&self) -> bool {
        matches!(self, RestError::Api { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RestError::Validation(_))
    }

    /// Get the HTTP status code if the failure happened after a response arrived
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RestError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        RestError::transport(message, status, Some(Box::new(err)))
    }
}

impl From<url::ParseError> for RestError {
    fn from(err: url::ParseError) -> Self {
        RestError::Validation(format!("URL parse error: {}", err))
    }
}

// Only raised while reading response payloads into caller types
impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::transport(format!("unexpected response shape: {}", err), None, Some(Box::new(err)))
    }
}

/// Result type for Cloudbeds operations
pub type Result<T> = std::result::Result<T, RestError>;
