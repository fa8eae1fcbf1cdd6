use super::{Attributes, Event, EventSink, LogSink};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

static NEXT_SPAN: AtomicU64 = AtomicU64::new(1);

/// Handle used by components to emit events and open spans
#[derive(Clone)]
pub struct Tracer {
    sink: Option<Arc<dyn EventSink>>,
}

impl Tracer {
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A tracer that drops every event
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn emit(&self, name: &str, attributes: Attributes) {
        if let Some(sink) = &self.sink {
            sink.emit(&Event::new(name, attributes));
        }
    }

    /// Open a span, emitting `trace.start` now and `trace.end` when the span is dropped
    #[must_use]
    pub fn span(&self, name: &str, attributes: Attributes) -> Span {
        let id = format!("{}-{}", std::process::id(), NEXT_SPAN.fetch_add(1, Ordering::Relaxed));

        let mut start = Attributes::new();
        let _ = start.insert("span".to_string(), Value::String(name.to_string()));
        let _ = start.insert("span_id".to_string(), Value::String(id.clone()));
        let _ = start.insert("attributes".to_string(), Value::Object(attributes.clone()));
        self.emit("trace.start", start);

        Span {
            tracer: self.clone(),
            name: name.to_string(),
            id,
            attributes,
            started: Instant::now(),
        }
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(Arc::new(LogSink))
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer").field("enabled", &self.sink.is_some()).finish()
    }
}

/// A scoped trace span; see [`Tracer::span`]
#[derive(Debug)]
pub struct Span {
    tracer: Tracer,
    name: String,
    id: String,
    attributes: Attributes,
    started: Instant,
}

impl Span {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        let duration_ms = (self.started.elapsed().as_secs_f64() * 1000.0 * 1000.0).round() / 1000.0;

        let mut end = Attributes::new();
        let _ = end.insert("span".to_string(), Value::String(self.name.clone()));
        let _ = end.insert("span_id".to_string(), Value::String(self.id.clone()));
        let _ = end.insert("duration_ms".to_string(), Value::from(duration_ms));
        let _ = end.insert("attributes".to_string(), Value::Object(core::mem::take(&mut self.attributes)));
        self.tracer.emit("trace.end", end);
    }
}
