//! Delivery-acknowledgement codes.

use serde::{Deserialize, Serialize};

/// Delivery state of a sent message, decoded from the backend's ack code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    /// Message failed to send.
    Error,
    /// Queued on the device.
    Pending,
    /// Accepted by the server.
    Sent,
    /// Delivered to the recipient.
    Received,
    /// Read by the recipient.
    Read,
    /// Audio/video played by the recipient (not always reported).
    Played,
    /// Code outside the known range.
    Unknown,
}

impl AckStatus {
    pub fn from_code(code: i8) -> Self {
        match code {
            -1 => Self::Error,
            0 => Self::Pending,
            1 => Self::Sent,
            2 => Self::Received,
            3 => Self::Read,
            4 => Self::Played,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Received => "RECEIVED",
            Self::Read => "READ",
            Self::Played => "PLAYED",
            Self::Unknown => "UNKNOWN",
        }
    }
}
