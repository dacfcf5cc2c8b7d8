use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use wagate_session::{MessagingSession, event::SessionEvent};

use crate::{forwarder::WebhookForwarder, state::BridgeState, status::ConnectionStatus};

/// Connects the session's event stream to the status holder and the webhook
/// forwarder, and owns the post-disconnect reconnect debounce.
///
/// Events are handled serially; the only work that runs concurrently with
/// subsequent events is webhook delivery (detached) and the reconnect timer.
pub struct StatusBridge {
    state: Arc<BridgeState>,
    forwarder: WebhookForwarder,
    session: Arc<dyn MessagingSession>,
    reconnect_delay: Duration,
}

impl StatusBridge {
    pub fn new(
        state: Arc<BridgeState>,
        forwarder: WebhookForwarder,
        session: Arc<dyn MessagingSession>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            state,
            forwarder,
            session,
            reconnect_delay,
        }
    }

    pub fn state(&self) -> &Arc<BridgeState> {
        &self.state
    }

    /// Process one lifecycle event: status first (synchronously), then QR
    /// and account-info bookkeeping, then fire-and-forget forwarding.
    pub async fn handle_event(&self, event: SessionEvent) {
        if let Some(status) = ConnectionStatus::implied_by(&event) {
            self.state.set_status(status).await;
        }

        match &event {
            SessionEvent::Qr { code } => {
                info!("QR code received, waiting for scan");
                self.state.set_qr(Some(code.clone())).await;
            },
            SessionEvent::Authenticated { info } => {
                info!("session authenticated");
                self.state.set_qr(None).await;
                if let Some(info) = info {
                    self.state.set_client_info(Some(info.clone())).await;
                }
            },
            SessionEvent::Ready { info } => {
                info!(account = %info.push_name, wid = %info.wid, "session ready");
                self.state.set_qr(None).await;
                self.state.set_client_info(Some(info.clone())).await;
            },
            SessionEvent::AuthFailure { message } => {
                error!(%message, "authentication failure, manual intervention required");
                self.state.set_qr(None).await;
            },
            SessionEvent::Disconnected { reason } => {
                warn!(%reason, "session disconnected");
                self.state.set_qr(None).await;
                self.schedule_reconnect();
            },
            SessionEvent::StateChange { state } => {
                info!(%state, "backend state changed");
            },
            SessionEvent::LoadingScreen { percent, message } => {
                info!(%percent, %message, "loading");
            },
            SessionEvent::MessageReceived(msg) => {
                info!(from = %msg.from, kind = %msg.kind, "incoming message");
            },
            SessionEvent::MessageAck(ack) => {
                info!(id = %ack.id, code = ack.ack, "message ack updated");
            },
        }

        self.forwarder.forward(event.name(), event.payload()).await;
    }

    /// Schedule one delayed reconnect attempt.
    ///
    /// A plain timer, deliberately not a backoff policy: if the status is no
    /// longer DISCONNECTED when it fires, the attempt is dropped. Overlapping
    /// disconnects may arm multiple timers; the status re-check is the only
    /// guard against duplicate initialize calls.
    fn schedule_reconnect(&self) {
        let state = Arc::clone(&self.state);
        let session = Arc::clone(&self.session);
        let delay = self.reconnect_delay;
        info!(delay_secs = delay.as_secs(), "scheduling reconnect attempt");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if state.status().await != ConnectionStatus::Disconnected {
                return;
            }
            info!("re-initializing session after disconnect");
            state.set_status(ConnectionStatus::Initializing).await;
            if let Err(e) = session.initialize().await {
                error!(error = %e, "re-initialization failed");
            }
        });
    }
}

/// Drain the session event stream until it closes.
pub async fn run(bridge: Arc<StatusBridge>, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        bridge.handle_event(event).await;
    }
}
