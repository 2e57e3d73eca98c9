use crate::error::{RestError, Result};
use crate::request::{Query, Request};
use crate::rest::CloudbedsClient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Events a webhook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    ReservationCreated,
    ReservationModified,
    ReservationCanceled,
    GuestCheckedIn,
    GuestCheckedOut,
    PaymentReceived,
    HousekeepingStatusChanged,
    RoomBlocked,
    RateUpdated,
    /// Every event
    All,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 10] = [
        WebhookEvent::ReservationCreated,
        WebhookEvent::ReservationModified,
        WebhookEvent::ReservationCanceled,
        WebhookEvent::GuestCheckedIn,
        WebhookEvent::GuestCheckedOut,
        WebhookEvent::PaymentReceived,
        WebhookEvent::HousekeepingStatusChanged,
        WebhookEvent::RoomBlocked,
        WebhookEvent::RateUpdated,
        WebhookEvent::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::ReservationCreated => "reservation_created",
            WebhookEvent::ReservationModified => "reservation_modified",
            WebhookEvent::ReservationCanceled => "reservation_canceled",
            WebhookEvent::GuestCheckedIn => "guest_checked_in",
            WebhookEvent::GuestCheckedOut => "guest_checked_out",
            WebhookEvent::PaymentReceived => "payment_received",
            WebhookEvent::HousekeepingStatusChanged => "housekeeping_status_changed",
            WebhookEvent::RoomBlocked => "room_blocked",
            WebhookEvent::RateUpdated => "rate_updated",
            WebhookEvent::All => "all",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self> {
        WebhookEvent::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| RestError::validation(format!("Unknown webhook event: {}", s)))
    }
}

/// A registered webhook as listed by `/getWebhooks`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    #[serde(rename = "webhookID", deserialize_with = "required_id")]
    pub webhook_id: String,
    pub url: String,
    pub event: String,
}

#[derive(Debug, Deserialize)]
struct CreatedWebhook {
    #[serde(rename = "webhookID", default, deserialize_with = "optional_id")]
    webhook_id: Option<String>,
}

// The API has returned IDs both as strings and as numbers
fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

fn required_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_id(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("webhookID must be a non-empty string or a number"))
}

/// Webhook subscription management for one client
#[derive(Debug, Clone, Copy)]
pub struct Webhooks<'a> {
    client: &'a CloudbedsClient,
}

impl CloudbedsClient {
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks { client: self }
    }
}

impl<'a> Webhooks<'a> {
    /// List the webhooks registered for a property
    pub fn list(&self, property_id: &str) -> Result<Vec<Webhook>> {
        let envelope = self
            .client
            .get("/getWebhooks", Query::new().with("propertyID", property_id))?;

        let records: Vec<Value> = match envelope.data {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(data) => serde_json::from_value(data)?,
        };

        let total = records.len();
        let webhooks: Vec<Webhook> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();
        if webhooks.len() < total {
            debug!(
                property_id,
                skipped = total - webhooks.len(),
                "skipped incomplete webhook records"
            );
        }

        Ok(webhooks)
    }

    /// Find the ID of the webhook delivering `event` to `url`
    pub fn find(&self, property_id: &str, url: &str, event: WebhookEvent) -> Result<Option<String>> {
        Ok(self
            .list(property_id)?
            .into_iter()
            .find(|w| w.url == url && w.event == event.as_str())
            .map(|w| w.webhook_id))
    }

    /// Best-effort form of [`Webhooks::find`]: any failure counts as "not registered"
    pub fn exists(&self, property_id: &str, url: &str, event: WebhookEvent) -> bool {
        match self.find(property_id, url, event) {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(property_id, error = %e, "failed to list Cloudbeds webhooks");
                false
            }
        }
    }

    /// Register a webhook and return its ID when the API reports one.
    ///
    /// `options` (for example `roomTypeID` or `includeFullDetails`) are merged
    /// into the request body next to `propertyID`, `url` and `event`.
    pub fn create(
        &self,
        property_id: &str,
        url: &str,
        event: WebhookEvent,
        options: Map<String, Value>,
    ) -> Result<Option<String>> {
        let mut body = Map::new();
        body.insert("propertyID".to_string(), Value::from(property_id));
        body.insert("url".to_string(), Value::from(url));
        body.insert("event".to_string(), Value::from(event.as_str()));
        body.extend(options);

        let envelope = self
            .client
            .request(&Request::post("/postWebhook").with_body(Value::Object(body)))?;

        let created = match envelope.data {
            Some(data @ Value::Object(_)) => serde_json::from_value::<CreatedWebhook>(data)?,
            _ => return Ok(None),
        };

        Ok(created.webhook_id.filter(|id| !id.is_empty()))
    }

    /// Remove a webhook registration
    pub fn delete(&self, property_id: &str, webhook_id: &str) -> Result<()> {
        self.client.delete(
            "/deleteWebhook",
            serde_json::json!({
                "propertyID": property_id,
                "webhookID": webhook_id,
            }),
        )?;
        Ok(())
    }
}

/// Decide whether a pushed payload belongs to the subscribed event.
///
/// Returns the payload untouched when it should be forwarded: the
/// subscription is [`WebhookEvent::All`], the payload names no event, or it
/// names the subscribed one. Returns `None` when it should be ignored.
pub fn accept_event(subscribed: WebhookEvent, payload: Value) -> Option<Value> {
    if subscribed == WebhookEvent::All {
        return Some(payload);
    }

    match payload.get("event").and_then(Value::as_str) {
        Some(received) if !received.is_empty() && received != subscribed.as_str() => None,
        _ => Some(payload),
    }
}
