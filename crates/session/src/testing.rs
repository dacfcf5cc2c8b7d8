//! Scriptable in-process backend for exercising the bridge and the gateway
//! without a real connection.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

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

/// Record of one send accepted by the fake.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat: ChatId,
    pub kind: &'static str,
    pub body: String,
}

/// Fake session: records sends, counts initialize calls, and lets the test
/// emit arbitrary lifecycle events to all subscribers.
#[derive(Default)]
pub struct FakeSession {
    initialize_calls: AtomicUsize,
    fail_sends: AtomicBool,
    sent: Mutex<Vec<SentRecord>>,
    chats: Mutex<Vec<ChatSummary>>,
    info: Mutex<Option<ClientInfo>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every subscriber.
    pub fn emit(&self, event: SessionEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent send operations fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn set_chats(&self, chats: Vec<ChatSummary>) {
        if let Ok(mut guard) = self.chats.lock() {
            *guard = chats;
        }
    }

    pub fn set_info(&self, info: ClientInfo) {
        if let Ok(mut guard) = self.info.lock() {
            *guard = Some(info);
        }
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, chat: &ChatId, kind: &'static str, body: &str) -> SessionResult<SentMessage> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SessionError::Backend("scripted failure".into()));
        }
        let id = {
            let mut guard = self
                .sent
                .lock()
                .map_err(|_| SessionError::Backend("poisoned".into()))?;
            guard.push(SentRecord {
                chat: chat.clone(),
                kind,
                body: body.to_string(),
            });
            format!("fake-{}", guard.len())
        };
        Ok(SentMessage { id })
    }
}

#[async_trait]
impl MessagingSession for FakeSession {
    async fn initialize(&self) -> SessionResult<()> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_text(&self, chat: &ChatId, text: &str) -> SessionResult<SentMessage> {
        self.record(chat, "text", text)
    }

    async fn send_media(
        &self,
        chat: &ChatId,
        media: MediaPayload,
        caption: Option<&str>,
    ) -> SessionResult<SentMessage> {
        let body = format!("{} ({} bytes)", media.mimetype, media.data.len());
        let _ = caption;
        self.record(chat, "media", &body)
    }

    async fn send_location(
        &self,
        chat: &ChatId,
        location: LocationPayload,
    ) -> SessionResult<SentMessage> {
        let body = format!("{},{}", location.latitude, location.longitude);
        self.record(chat, "location", &body)
    }

    async fn send_buttons(
        &self,
        chat: &ChatId,
        body: &str,
        _buttons: &[ButtonSpec],
        _title: Option<&str>,
        _footer: Option<&str>,
    ) -> SessionResult<SentMessage> {
        self.record(chat, "buttons", body)
    }

    async fn send_list(
        &self,
        chat: &ChatId,
        body: &str,
        _button_text: &str,
        _sections: &[ListSection],
        _title: Option<&str>,
        _footer: Option<&str>,
    ) -> SessionResult<SentMessage> {
        self.record(chat, "list", body)
    }

    async fn chats(&self) -> SessionResult<Vec<ChatSummary>> {
        Ok(self.chats.lock().map(|c| c.clone()).unwrap_or_default())
    }

    async fn client_info(&self) -> Option<ClientInfo> {
        self.info.lock().ok().and_then(|g| g.clone())
    }

    async fn logout(&self) -> SessionResult<()> {
        Ok(())
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
