//! Placeholder backend used when no real session is wired in.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    MessagingSession, SessionError, SessionResult,
    chat::ChatId,
    event::SessionEvent,
    types::{
        ButtonSpec, ChatSummary, ClientInfo, ListSection, LocationPayload, MediaPayload,
        SentMessage,
    },
};

/// Backend that errors on every operation and emits no events.
///
/// Keeps the gateway bootable without a browser-automation backend; every
/// send surfaces [`SessionError::NotConfigured`] to the caller.
#[derive(Default)]
pub struct NoopSession {
    // Senders are retained so subscribers see a silent stream rather than a
    // closed one.
    subscribers: std::sync::Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
}

impl NoopSession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingSession for NoopSession {
    async fn initialize(&self) -> SessionResult<()> {
        Err(SessionError::NotConfigured)
    }

    async fn send_text(&self, _chat: &ChatId, _text: &str) -> SessionResult<SentMessage> {
        Err(SessionError::NotConfigured)
    }

    async fn send_media(
        &self,
        _chat: &ChatId,
        _media: MediaPayload,
        _caption: Option<&str>,
    ) -> SessionResult<SentMessage> {
        Err(SessionError::NotConfigured)
    }

    async fn send_location(
        &self,
        _chat: &ChatId,
        _location: LocationPayload,
    ) -> SessionResult<SentMessage> {
        Err(SessionError::NotConfigured)
    }

    async fn send_buttons(
        &self,
        _chat: &ChatId,
        _body: &str,
        _buttons: &[ButtonSpec],
        _title: Option<&str>,
        _footer: Option<&str>,
    ) -> SessionResult<SentMessage> {
        Err(SessionError::NotConfigured)
    }

    async fn send_list(
        &self,
        _chat: &ChatId,
        _body: &str,
        _button_text: &str,
        _sections: &[ListSection],
        _title: Option<&str>,
        _footer: Option<&str>,
    ) -> SessionResult<SentMessage> {
        Err(SessionError::NotConfigured)
    }

    async fn chats(&self) -> SessionResult<Vec<ChatSummary>> {
        Err(SessionError::NotConfigured)
    }

    async fn client_info(&self) -> Option<ClientInfo> {
        None
    }

    async fn logout(&self) -> SessionResult<()> {
        Err(SessionError::NotConfigured)
    }

    async fn destroy(&self) -> SessionResult<()> {
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }
}
