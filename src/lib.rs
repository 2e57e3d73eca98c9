//! # cloudbeds - Cloudbeds PMS REST client for Rust
//!
//! A blocking client for the Cloudbeds hospitality Property Management System
//! API. It builds requests against the v1.2 REST endpoints, authenticates them
//! with a bearer token, and maps the API's `{success, data, ...}` envelope into
//! typed results and errors.
//!
//! ## Features
//!
//! - One call per request with uniform error mapping:
//!   transport failures, API-reported failures and caller validation errors
//! - API key or OAuth2 access token authentication
//! - Query sanitation: unset and empty parameters are never sent
//! - Paginated listing with `pageNumber`/`pageSize` accumulation
//! - A catalog of the business operations of every resource
//! - Webhook subscription management and inbound event filtering
//!
//! ## Basic Usage
//!
//! ```no_run
//! use cloudbeds::{CloudbedsClient, Credential, Query};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CloudbedsClient::new(Credential::api_key("cbat_..."))?;
//!
//!     let hotels = client.get("/getHotels", Query::new())?;
//!     println!("Hotels: {:?}", hotels.raw());
//!     Ok(())
//! }
//! ```
//!
//! ## Fetching every page
//!
//! ```no_run
//! use cloudbeds::{CloudbedsClient, Credential, Request};
//!
//! let client = CloudbedsClient::new(Credential::api_key("cbat_..."))?;
//! let guests = client.fetch_all(&Request::get("/getGuests").param("propertyID", "123"))?;
//! println!("{} guests", guests.len());
//! # Ok::<(), cloudbeds::RestError>(())
//! ```
//!
//! ## Running a catalog operation
//!
//! ```no_run
//! use cloudbeds::{CloudbedsClient, Credential, ListMode, Operation, Params, Query};
//!
//! let client = CloudbedsClient::new(Credential::oauth2("id", "secret", "access", "refresh"))?;
//! let operation = Operation::parse("reservation", "getByDates")?;
//! let params = Params::query(
//!     Query::new()
//!         .with("propertyID", "123")
//!         .with("startDate", "2024-01-01")
//!         .with("endDate", "2024-01-31"),
//! )
//! .with_list(ListMode::All);
//!
//! let reservations = client.execute(operation, params)?;
//! # Ok::<(), cloudbeds::RestError>(())
//! ```

pub mod client;
pub mod credential;
pub mod dates;
pub mod error;
pub mod operation;
pub mod paginate;
pub mod request;
pub mod response;
pub mod rest;
pub mod transport;
pub mod webhook;

// Re-export main types for convenience
pub use client::{Config, DEFAULT_BASE_URL};
pub use credential::Credential;
pub use dates::{default_date_range, format_date, validate_date_range};
pub use error::{RestError, Result};
pub use operation::{ListMode, Operation, Params, Resource, Route};
pub use paginate::PAGE_SIZE;
pub use request::{Method, Query, Request};
pub use response::Envelope;
pub use rest::CloudbedsClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use webhook::{accept_event, Webhook, WebhookEvent, Webhooks};

// Re-export serde_json for convenience
pub use serde_json::json;
