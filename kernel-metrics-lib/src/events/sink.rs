use super::Event;
use std::sync::{Mutex, PoisonError};

pub(super) const LOG_TARGET: &str = "    events";

/// Destination for structured events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Writes every event as one line of JSON at `info` level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &Event) {
        // serde_json::Map without `preserve_order` is a BTreeMap, so keys come out sorted
        log::info!(target: LOG_TARGET, "{}", event.to_record());
    }
}

/// Keeps every emitted event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far, in emission order
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Names of the events emitted so far, in emission order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|event| event.name.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}
