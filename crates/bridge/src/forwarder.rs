use std::{sync::Arc, time::Duration};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::state::BridgeState;

/// JSON body POSTed to the webhook target, built fresh per event.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEnvelope {
    pub event: String,
    pub data: serde_json::Value,
    /// ISO-8601, UTC, taken when the envelope is built.
    pub timestamp: String,
}

impl WebhookEnvelope {
    pub fn new(event: &str, data: serde_json::Value) -> Self {
        Self {
            event: event.to_string(),
            data,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Best-effort webhook dispatcher.
///
/// Contract: one POST per forwarded event, bounded timeout, no retries.
/// Delivery failures (transport errors, timeouts, non-2xx) are logged at
/// warn and dropped; they never reach the event source.
pub struct WebhookForwarder {
    client: reqwest::Client,
    state: Arc<BridgeState>,
}

impl WebhookForwarder {
    pub fn new(state: Arc<BridgeState>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client, state }
    }

    /// Forward an event as a detached task. Returns immediately; if no
    /// target is configured, nothing is spawned.
    pub async fn forward(&self, event: &str, data: serde_json::Value) {
        let Some(url) = self.state.webhook_url().await else {
            return;
        };
        let envelope = WebhookEnvelope::new(event, data);
        let client = self.client.clone();
        tokio::spawn(async move {
            deliver(&client, &url, &envelope).await;
        });
    }

    /// POST an envelope and wait for the outcome. Exposed separately from
    /// [`forward`](Self::forward) so tests can observe delivery.
    pub async fn deliver_now(&self, url: &str, envelope: &WebhookEnvelope) {
        deliver(&self.client, url, envelope).await;
    }
}

async fn deliver(client: &reqwest::Client, url: &str, envelope: &WebhookEnvelope) {
    match client.post(url).json(envelope).send().await {
        Ok(resp) if resp.status().is_success() => {
            debug!(event = %envelope.event, %url, "webhook delivered");
        },
        Ok(resp) => {
            warn!(event = %envelope.event, %url, status = %resp.status(), "webhook rejected");
        },
        Err(e) => {
            warn!(event = %envelope.event, %url, error = %e, "webhook delivery failed");
        },
    }
}
