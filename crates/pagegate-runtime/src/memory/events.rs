//! [`EventBus`] implementations.

use pagegate_auth::{CollaboratorError, EventBus};
use parking_lot::Mutex;
use tracing::info;

/// Logs every event at info level and drops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<(), CollaboratorError> {
        info!(event, %payload, "Event emitted");
        Ok(())
    }
}

/// An event captured by [`RecordingEventBus`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// Keeps every emitted event for later inspection.
///
/// # Example
///
/// ```
/// use pagegate_auth::EventBus;
/// use pagegate_runtime::RecordingEventBus;
///
/// let bus = RecordingEventBus::new();
/// bus.emit("user.logout", serde_json::json!({ "login": "alice" })).unwrap();
///
/// assert_eq!(bus.count("user.logout"), 1);
/// assert_eq!(bus.events()[0].payload["login"], "alice");
/// ```
#[derive(Debug, Default)]
pub struct RecordingEventBus {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    /// Number of events named `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.lock().iter().filter(|e| e.name == name).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventBus for RecordingEventBus {
    fn emit(&self, event: &str, payload: serde_json::Value) -> Result<(), CollaboratorError> {
        self.events.lock().push(RecordedEvent {
            name: event.to_string(),
            payload,
        });
        Ok(())
    }
}
