//! # Notification Sinks
//!
//! Where user-facing failure messages go. Delivery is fire-and-forget: a
//! sink never fails back into the engine.
//!
//! ```text
//! CartEngine ──report_error("Requested quantity out of stock")──► sink
//!                                                                  │
//!              ┌───────────────────────┬───────────────────────────┤
//!              ▼                       ▼                           ▼
//!         TracingSink             ChannelSink                RecordingSink
//!         WARN event              UI event loop              assertions
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::warn;

/// Receives messages meant for the shopper.
pub trait NotificationSink: Send + Sync {
    fn report_error(&self, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn report_error(&self, message: &str) {
        (**self).report_error(message)
    }
}

/// Logs each message as a WARN event. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn report_error(&self, message: &str) {
        warn!(target: "trolley::notify", "{message}");
    }
}

/// Forwards messages to an unbounded channel.
///
/// A closed receiver drops messages silently.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelSink { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn report_error(&self, message: &str) {
        let _ = self.tx.send(message.to_string());
    }
}

/// Keeps every message in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for RecordingSink {
    fn report_error(&self, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}
