//! Messaging session abstraction.
//!
//! The actual WhatsApp connection (browser automation, QR pairing, message
//! transport) lives in an external backend. This crate defines the trait
//! boundary the gateway and the status bridge program against, the lifecycle
//! event types the backend emits, and the payload shapes that cross it.

pub mod ack;
pub mod chat;
pub mod event;
pub mod noop;
pub mod testing;
pub mod types;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    chat::ChatId,
    event::SessionEvent,
    types::{
        ButtonSpec, ChatSummary, ClientInfo, ListSection, LocationPayload, MediaPayload,
        SentMessage,
    },
};

/// Errors produced by a session backend.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No real backend is wired in (noop placeholder).
    #[error("no session backend configured")]
    NotConfigured,

    /// The backend rejected or failed the operation.
    #[error("session backend error: {0}")]
    Backend(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// A persistent WhatsApp session owned by an external backend.
///
/// Lifecycle events (QR issued, authenticated, ready, disconnected, incoming
/// traffic) are delivered through [`subscribe`](MessagingSession::subscribe)
/// rather than callbacks, so the bridge can be driven by a fake source in
/// tests.
#[async_trait]
pub trait MessagingSession: Send + Sync {
    /// Start (or restart) the underlying connection. Progress is reported
    /// through the event stream, not the return value.
    async fn initialize(&self) -> SessionResult<()>;

    async fn send_text(&self, chat: &ChatId, text: &str) -> SessionResult<SentMessage>;

    async fn send_media(
        &self,
        chat: &ChatId,
        media: MediaPayload,
        caption: Option<&str>,
    ) -> SessionResult<SentMessage>;

    async fn send_location(
        &self,
        chat: &ChatId,
        location: LocationPayload,
    ) -> SessionResult<SentMessage>;

    async fn send_buttons(
        &self,
        chat: &ChatId,
        body: &str,
        buttons: &[ButtonSpec],
        title: Option<&str>,
        footer: Option<&str>,
    ) -> SessionResult<SentMessage>;

    async fn send_list(
        &self,
        chat: &ChatId,
        body: &str,
        button_text: &str,
        sections: &[ListSection],
        title: Option<&str>,
        footer: Option<&str>,
    ) -> SessionResult<SentMessage>;

    /// All chats known to the session.
    async fn chats(&self) -> SessionResult<Vec<ChatSummary>>;

    /// Account info, available once authenticated.
    async fn client_info(&self) -> Option<ClientInfo>;

    /// Log out and clear session data. Next initialize requires a QR scan.
    async fn logout(&self) -> SessionResult<()>;

    /// Close the connection, keeping session data for a faster reconnect.
    async fn destroy(&self) -> SessionResult<()>;

    /// Subscribe to lifecycle events. Each call returns an independent
    /// receiver; events are delivered in emission order.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent>;
}
