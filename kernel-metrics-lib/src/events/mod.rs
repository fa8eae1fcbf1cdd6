//! Structured events and scoped trace spans
//!
//! Evaluation and registry loading report what they do as named events with
//! JSON attributes (`derived.metric`, `registry.type.loaded`, ...). Events are an
//! observability side-channel: nothing computed by the library depends on
//! whether, or where, they are delivered.
//!
//! # Implementation Model
//!
//! - [`Event`] is a name plus an ordered attribute object.
//! - [`EventSink`] receives events. [`LogSink`] writes each event as a single
//!   line of JSON through the `log` facade; [`MemorySink`] keeps them for later
//!   inspection.
//! - [`Tracer`] is the cloneable handle components hold. Besides plain
//!   [`Tracer::emit`], it opens [`Span`]s which emit paired `trace.start` and
//!   `trace.end` events, the latter carrying the elapsed time in milliseconds.

mod event;
mod sink;
mod tracer;

pub use event::{Attributes, Event, attributes};
pub use sink::{EventSink, LogSink, MemorySink};
pub use tracer::{Span, Tracer};
