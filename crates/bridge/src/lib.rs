//! Status/webhook bridge.
//!
//! Sits between the session's lifecycle event stream and the outside world:
//! mirrors the most recent event into a process-wide [`ConnectionStatus`],
//! relays every event (timestamped) to an operator-configured webhook, and
//! schedules a single debounced reconnect attempt after a disconnect.
//!
//! Webhook delivery is best-effort by contract: fire-and-forget, bounded
//! timeout, failures logged and swallowed, never retried. Event handling is
//! never blocked on delivery.

mod bridge;
mod forwarder;
mod state;
mod status;

pub use {
    bridge::{StatusBridge, run},
    forwarder::{WebhookEnvelope, WebhookForwarder},
    state::{BridgeState, WebhookUrlError},
    status::ConnectionStatus,
};
