//! Outbound domain events
//!
//! The notification collaborator consumes these; the core never blocks on
//! it. Events are posted on a spawned task after the owning transaction
//! has committed, signed with HMAC-SHA256 when a secret is configured, and
//! delivery failures are logged rather than propagated.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

pub const INSPECTION_COMPLETED: &str = "inspection.completed";
pub const VIOLATION_REPORTED: &str = "violation.reported";
pub const CERTIFICATE_ISSUED: &str = "certificate.issued";
pub const CERTIFICATE_REVOKED: &str = "certificate.revoked";

/// Event payload: the affected record's id plus its new status
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub event: String,
    pub entity_id: Uuid,
    pub status: String,
    pub occurred_at: DateTime<Utc>,
}

/// Fire-and-forget webhook dispatcher
#[derive(Clone)]
pub struct EventDispatcher {
    client: Client,
    endpoint: Option<String>,
    signing_secret: Option<String>,
}

impl EventDispatcher {
    pub fn new(endpoint: Option<String>, signing_secret: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            signing_secret,
        }
    }

    /// Queue delivery of an event. Call only after the owning transaction
    /// has committed.
    pub fn emit(&self, event: &'static str, entity_id: Uuid, status: &str) {
        let Some(endpoint) = self.endpoint.clone() else {
            tracing::debug!("Event endpoint not configured, skipping {}", event);
            return;
        };

        let envelope = EventEnvelope {
            event: event.to_string(),
            entity_id,
            status: status.to_string(),
            occurred_at: Utc::now(),
        };
        let client = self.client.clone();
        let secret = self.signing_secret.clone();

        tokio::spawn(async move {
            let body = match serde_json::to_vec(&envelope) {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Failed to serialize event {}: {}", envelope.event, e);
                    return;
                }
            };

            let mut request = client
                .post(&endpoint)
                .header("content-type", "application/json");
            if let Some(signature) = secret.as_deref().and_then(|s| sign_payload(s, &body)) {
                request = request.header("x-hsi-signature", signature);
            }

            match request.body(body).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!("Delivered event {} for {}", envelope.event, envelope.entity_id);
                }
                Ok(response) => {
                    tracing::warn!(
                        "Event endpoint returned {} for {}",
                        response.status(),
                        envelope.event
                    );
                }
                Err(e) => {
                    tracing::warn!("Event delivery failed for {}: {}", envelope.event, e);
                }
            }
        });
    }
}

/// HMAC-SHA256 signature of the payload, base64 encoded
fn sign_payload(secret: &str, payload: &[u8]) -> Option<String> {
    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload);
    Some(BASE64.encode(mac.finalize().into_bytes()))
}
