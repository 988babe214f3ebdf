//! Telemetry for BLEEP modules: typed events, monotonic counters and the
//! sinks they are delivered to.
//!
//! Emission is fire-and-forget. Nothing a sink does can change the control
//! flow or the return value of the operation that emitted into it.

pub mod event;
pub mod observability;
pub mod sink;

pub use event::{Event, EventAttribute};
pub use observability::{EventId, ObservabilityEngine, ObservableEvent, TelemetrySnapshot};
pub use sink::{counter_name, LogSink, NoopSink, TelemetrySink};
