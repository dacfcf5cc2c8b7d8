//! Bulk sending: one message to many recipients, paced by a random delay.

use std::{
    path::Path,
    sync::Arc,
    time::Duration,
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use wagate_session::{MessagingSession, chat::ChatId, types::MediaPayload};

/// Inter-message pacing bounds, mutable at runtime via the settings route.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelaySettings {
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
}

impl DelaySettings {
    /// Draw a delay from the configured window.
    fn sample(&self) -> Duration {
        let (lo, hi) = (self.delay_min_ms, self.delay_max_ms.max(self.delay_min_ms));
        let ms = if lo == hi {
            lo
        } else {
            rand::rng().random_range(lo..=hi)
        };
        Duration::from_millis(ms)
    }
}

/// Outcome of a bulk run.
#[derive(Debug, Default, Serialize)]
pub struct BulkReport {
    pub sent: usize,
    pub failed: usize,
}

/// Load recipient numbers from a text file: one per line, trimmed, blank
/// lines skipped.
pub fn load_recipients(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Send `text` (or `media` with an optional caption) to every recipient in
/// order, sleeping a sampled delay between sends. Per-recipient failures are
/// logged and counted, never aborting the run.
pub async fn send_to_all(
    session: &Arc<dyn MessagingSession>,
    recipients: &[String],
    text: Option<&str>,
    media: Option<&MediaPayload>,
    delays: DelaySettings,
) -> BulkReport {
    let mut report = BulkReport::default();
    let mut iter = recipients.iter().peekable();

    while let Some(number) = iter.next() {
        let chat = ChatId::normalize(number);
        let result = match (media, text) {
            (Some(media), caption) => session.send_media(&chat, media.clone(), caption).await,
            (None, Some(text)) => session.send_text(&chat, text).await,
            (None, None) => break,
        };
        match result {
            Ok(msg) => {
                info!(chat = %chat, id = %msg.id, "bulk message sent");
                report.sent += 1;
            },
            Err(e) => {
                warn!(chat = %chat, error = %e, "bulk send failed, continuing");
                report.failed += 1;
            },
        }
        if iter.peek().is_some() {
            let wait = delays.sample();
            tokio::time::sleep(wait).await;
        }
    }

    report
}
