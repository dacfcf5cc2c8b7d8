use std::fmt;

use serde::{Deserialize, Serialize};

use wagate_session::event::SessionEvent;

/// Connection state mirrored from the session's lifecycle events.
///
/// Exactly one value is live at a time. Transitions are driven solely by the
/// events the session emits; the bridge does not validate their legality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Initializing,
    QrReceived,
    Authenticated,
    Ready,
    AuthFailure,
    Disconnected,
    ShuttingDown,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::QrReceived => "QR_RECEIVED",
            Self::Authenticated => "AUTHENTICATED",
            Self::Ready => "READY",
            Self::AuthFailure => "AUTH_FAILURE",
            Self::Disconnected => "DISCONNECTED",
            Self::ShuttingDown => "SHUTTING_DOWN",
        }
    }

    /// The status implied by an event, if any. Traffic events
    /// (messages, acks) and informational events carry no status.
    pub fn implied_by(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::Qr { .. } => Some(Self::QrReceived),
            SessionEvent::Authenticated { .. } => Some(Self::Authenticated),
            SessionEvent::Ready { .. } => Some(Self::Ready),
            SessionEvent::AuthFailure { .. } => Some(Self::AuthFailure),
            SessionEvent::Disconnected { .. } => Some(Self::Disconnected),
            SessionEvent::StateChange { .. }
            | SessionEvent::LoadingScreen { .. }
            | SessionEvent::MessageReceived(..)
            | SessionEvent::MessageAck(..) => None,
        }
    }

    /// Whether the session has valid credentials (QR no longer needed).
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Ready)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
