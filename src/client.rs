use crate::error::Result;
use reqwest::blocking::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;

/// Base URL of the Cloudbeds v1.2 API
pub const DEFAULT_BASE_URL: &str = "https://hotels.cloudbeds.com/api/v1.2";

/// Create the HTTP client for API requests with pooling and the configured timeouts
pub fn create_rest_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .build()?;
    Ok(client)
}

/// Configuration for the Cloudbeds client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base URL, endpoints are appended verbatim
    pub base_url: String,
    /// Per-request timeout in milliseconds; expiry surfaces as a transport error
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Upper bound on pages fetched by a single paginated call (unbounded when unset)
    pub max_pages: Option<u32>,
    /// Log a one-line notice when a client is built
    pub announce: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 300_000,
            connect_timeout_ms: 10_000,
            max_pages: None,
            announce: false,
        }
    }
}

impl Config {
    /// Create a configuration pointing at another base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            ..Config::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_ms(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = duration_ms(timeout);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
