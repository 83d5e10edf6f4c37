//! Progress events, sinks, and the per-invocation event bus.
//!
//! Nodes emit scoped progress messages through their
//! [`NodeContext`](crate::node::NodeContext); the runtime emits
//! diagnostics. The [`EventBus`] fans everything out to pluggable
//! [`EventSink`]s (stdout by default, in-memory for tests).

pub mod bus;
pub mod event;
pub mod sink;

pub use bus::EventBus;
pub use event::{DiagnosticEvent, Event, NodeEvent, STREAM_END_SCOPE};
pub use sink::{EventSink, MemorySink, StdErrSink, StdOutSink};
