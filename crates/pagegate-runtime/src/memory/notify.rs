//! [`NotificationSink`] implementations.

use pagegate_auth::NotificationSink;
use parking_lot::Mutex;
use tracing::info;

/// Logs success messages instead of flashing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifications;

impl NotificationSink for TracingNotifications {
    fn success(&self, message_key: &str) {
        info!(key = message_key, "Success notification");
    }
}

/// Collects success message keys in order.
#[derive(Debug, Default)]
pub struct RecordingNotifications {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// The most recent message key.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.messages.lock().last().cloned()
    }
}

impl NotificationSink for RecordingNotifications {
    fn success(&self, message_key: &str) {
        self.messages.lock().push(message_key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let sink = RecordingNotifications::new();
        assert!(sink.last().is_none());

        sink.success("first");
        sink.success("second");

        assert_eq!(sink.messages(), vec!["first", "second"]);
        assert_eq!(sink.last().as_deref(), Some("second"));
    }
}
