//! Lifecycle events emitted by a session backend.

use serde_json::json;

use crate::{
    ack::AckStatus,
    types::{AckUpdate, ClientInfo, IncomingMessage},
};

/// A named notification from the session: connection-state changes and
/// inbound traffic. Payload shapes are backend-defined; the bridge treats
/// them as opaque JSON when forwarding.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A pairing QR code was issued and awaits a scan.
    Qr { code: String },
    /// Credentials accepted; the session is being restored.
    Authenticated { info: Option<ClientInfo> },
    /// Fully connected and able to send.
    Ready { info: ClientInfo },
    /// Stored credentials were rejected; manual intervention required.
    AuthFailure { message: String },
    /// Connection lost.
    Disconnected { reason: String },
    /// Internal backend state transition (informational).
    StateChange { state: String },
    /// Startup progress report.
    LoadingScreen { percent: u8, message: String },
    /// An inbound (or echoed outbound) message.
    MessageReceived(IncomingMessage),
    /// Delivery acknowledgement for a sent message.
    MessageAck(AckUpdate),
}

impl SessionEvent {
    /// Stable wire name used in webhook envelopes and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Qr { .. } => "qr",
            Self::Authenticated { .. } => "authenticated",
            Self::Ready { .. } => "ready",
            Self::AuthFailure { .. } => "auth_failure",
            Self::Disconnected { .. } => "disconnected",
            Self::StateChange { .. } => "state_change",
            Self::LoadingScreen { .. } => "loading_screen",
            Self::MessageReceived(..) => "message_received",
            Self::MessageAck(..) => "message_ack",
        }
    }

    /// Webhook payload for this event.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Qr { code } => json!({ "qr": code }),
            Self::Authenticated { info } => json!({ "info": info }),
            Self::Ready { info } => json!({ "info": info }),
            Self::AuthFailure { message } => json!({ "message": message }),
            Self::Disconnected { reason } => json!({ "reason": reason }),
            Self::StateChange { state } => json!({ "state": state }),
            Self::LoadingScreen { percent, message } => {
                json!({ "percent": percent, "message": message })
            },
            Self::MessageReceived(msg) => {
                serde_json::to_value(msg).unwrap_or_else(|_| json!({}))
            },
            Self::MessageAck(ack) => json!({
                "id": ack.id,
                "from": ack.from,
                "to": ack.to,
                "ack": ack.ack,
                "ack_status": AckStatus::from_code(ack.ack).as_str(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_stable() {
        let ev = SessionEvent::Disconnected {
            reason: "NAVIGATION".into(),
        };
        assert_eq!(ev.name(), "disconnected");
        assert_eq!(ev.payload()["reason"], "NAVIGATION");
    }

    #[test]
    fn ack_payload_carries_decoded_status() {
        let ev = SessionEvent::MessageAck(AckUpdate {
            id: "m1".into(),
            from: "a@c.us".into(),
            to: "b@c.us".into(),
            ack: 3,
        });
        let payload = ev.payload();
        assert_eq!(payload["ack"], 3);
        assert_eq!(payload["ack_status"], "READ");
    }

    #[test]
    fn qr_payload_exposes_the_code() {
        let ev = SessionEvent::Qr { code: "2@abc".into() };
        assert_eq!(ev.name(), "qr");
        assert_eq!(ev.payload()["qr"], "2@abc");
    }
}
