//! Notification sink for a terminal session.

use trolley_session::NotificationSink;

/// Prints shopper-facing failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn report_error(&self, message: &str) {
        eprintln!("! {message}");
    }
}
