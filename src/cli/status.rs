use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::utils::clock::Clock;

pub const DEFAULT_STATUS_LIFETIME: Duration = Duration::from_secs(2);

pub type StatusMessage = Option<Arc<str>>;

/// Transient status line, e.g. "Travel record added.". Every message is cleared by a background
/// task after `lifetime` unless a newer message replaces it first, in which case the older task is
/// cancelled.
///
/// Must be used inside a tokio runtime.
pub struct StatusFlash {
    sender: Arc<watch::Sender<StatusMessage>>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
    pending: Option<CancellationToken>,
}

impl StatusFlash {
    pub fn new(clock: Arc<dyn Clock>, lifetime: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            clock,
            lifetime,
            pending: None,
        }
    }

    pub fn current(&self) -> StatusMessage {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusMessage> {
        self.sender.subscribe()
    }

    /// Shows `message` and schedules its removal.
    pub fn flash(&mut self, message: impl Into<Arc<str>>) {
        self.cancel();
        self.sender.send_replace(Some(message.into()));

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let deadline = self.clock.instant() + self.lifetime;
        let clock = self.clock.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                // A newer message owns the status line now.
                _ = cancelled.cancelled() => (),
                _ = clock.sleep_until(deadline) => {
                    debug!("Clearing status message");
                    sender.send_replace(None);
                }
            }
        });
        self.pending = Some(token);
    }

    /// Removes the current message immediately.
    pub fn clear(&mut self) {
        self.cancel();
        self.sender.send_replace(None);
    }

    fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for StatusFlash {
    fn drop(&mut self) {
        self.cancel();
    }
}
