//! Debounced delivery of search terms
//!
//! Each pushed term starts a quiet-period timer and cancels the previous
//! one, so a typing burst delivers only its final term.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period used when the caller does not pick one
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Debounces a stream of search terms onto a channel
pub struct Debouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer and the receiver its terms arrive on
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Create a debouncer with the default quiet period
    pub fn with_default_delay() -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::new(DEFAULT_DEBOUNCE)
    }

    /// Submit the latest term, displacing any undelivered one
    pub fn push(&mut self, term: &str) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        let tx = self.tx.clone();
        let delay = self.delay;
        let term = term.to_string();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // the receiver may already be gone
            let _ = tx.send(term);
        }));
    }

    /// Drop the undelivered term, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
