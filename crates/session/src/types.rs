//! Payload shapes crossing the session boundary.

use serde::{Deserialize, Serialize};

/// Account identity, available once the session is authenticated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientInfo {
    /// Display name of the connected account.
    pub push_name: String,
    /// WhatsApp id of the connected account (phone-number part).
    pub wid: String,
}

/// Handle to a message accepted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    /// Serialized message id, unique per chat.
    pub id: String,
}

/// In-memory media attachment.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub mimetype: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// A shared location pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// One button of an interactive buttons message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub id: String,
    pub body: String,
}

/// One row of a list-message section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A titled section of a list message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

/// Reduced chat listing entry exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    pub name: String,
    pub is_group: bool,
    /// Unix timestamp of the last activity.
    pub timestamp: i64,
    pub unread_count: u32,
}

/// An inbound message as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: String,
    pub from: String,
    pub to: String,
    pub body: String,
    /// Backend message kind ("chat", "image", "ptt", "document", ...).
    pub kind: String,
    /// Unix timestamp assigned by the backend.
    pub timestamp: i64,
    pub from_me: bool,
    pub has_media: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaInfo>,
}

/// Metadata about an attachment; raw bytes stay with the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub mimetype: Option<String>,
    pub filename: Option<String>,
}

/// A delivery-acknowledgement update for a previously sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckUpdate {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Raw ack code as reported by the backend (-1..=4).
    pub ack: i8,
}
