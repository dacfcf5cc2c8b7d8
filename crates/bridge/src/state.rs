use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use wagate_session::types::ClientInfo;

use crate::status::ConnectionStatus;

/// Webhook URL rejected by validation.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookUrlError {
    Empty,
    NotHttp,
}

impl std::fmt::Display for WebhookUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("webhook URL must not be empty"),
            Self::NotHttp => f.write_str("webhook URL must start with http:// or https://"),
        }
    }
}

impl std::error::Error for WebhookUrlError {}

/// Explicit holder for the bridge's runtime state, shared as `Arc` between
/// the event loop and the HTTP handlers. Replaces the ambient globals of a
/// naive rendition: status, the pending QR code, cached account info, and
/// the webhook target all live here.
pub struct BridgeState {
    status: RwLock<ConnectionStatus>,
    status_since: RwLock<DateTime<Utc>>,
    qr: RwLock<Option<String>>,
    client_info: RwLock<Option<ClientInfo>>,
    webhook_url: RwLock<Option<String>>,
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl BridgeState {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            status: RwLock::new(ConnectionStatus::Initializing),
            status_since: RwLock::new(Utc::now()),
            qr: RwLock::new(None),
            client_info: RwLock::new(None),
            webhook_url: RwLock::new(webhook_url),
        }
    }

    pub async fn status(&self) -> ConnectionStatus {
        *self.status.read().await
    }

    pub async fn set_status(&self, status: ConnectionStatus) {
        *self.status.write().await = status;
        *self.status_since.write().await = Utc::now();
    }

    /// When the current status took effect.
    pub async fn status_since(&self) -> DateTime<Utc> {
        *self.status_since.read().await
    }

    pub async fn qr(&self) -> Option<String> {
        self.qr.read().await.clone()
    }

    pub async fn set_qr(&self, code: Option<String>) {
        *self.qr.write().await = code;
    }

    pub async fn client_info(&self) -> Option<ClientInfo> {
        self.client_info.read().await.clone()
    }

    pub async fn set_client_info(&self, info: Option<ClientInfo>) {
        *self.client_info.write().await = info;
    }

    pub async fn webhook_url(&self) -> Option<String> {
        self.webhook_url.read().await.clone()
    }

    /// Set the webhook target. The URL must be non-empty and HTTP(S).
    pub async fn set_webhook_url(&self, url: &str) -> Result<(), WebhookUrlError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(WebhookUrlError::Empty);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(WebhookUrlError::NotHttp);
        }
        *self.webhook_url.write().await = Some(url.to_string());
        Ok(())
    }

    /// Clear the webhook target. Returns the previous URL, if any.
    pub async fn clear_webhook_url(&self) -> Option<String> {
        self.webhook_url.write().await.take()
    }
}
