//! Config schema types (server, auth, webhook, session, bulk sending).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WagateConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub webhook: WebhookConfig,
    pub session: SessionConfig,
    pub bulk: BulkConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 3004,
        }
    }
}

/// API authentication. The key may also come from `WAGATE_API_KEY`; the
/// environment takes precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub api_key: Option<String>,
}

/// Outbound event forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Target URL; absence disables forwarding.
    pub url: Option<String>,
    /// Per-delivery timeout.
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 10,
        }
    }
}

/// Session backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the backend persists credentials. Defaults to the data dir.
    pub data_dir: Option<PathBuf>,
    /// Cooldown before the single post-disconnect reconnect attempt.
    pub reconnect_delay_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            reconnect_delay_secs: 30,
        }
    }
}

/// Bulk-send pacing and recipient source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Text file with one recipient number per line.
    pub recipients_file: Option<PathBuf>,
    /// Lower bound of the random inter-message delay.
    pub delay_min_ms: u64,
    /// Upper bound of the random inter-message delay.
    pub delay_max_ms: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            recipients_file: None,
            delay_min_ms: 1000,
            delay_max_ms: 3000,
        }
    }
}
