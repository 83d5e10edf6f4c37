use std::sync::{Arc, Mutex};

use super::event::Event;
use super::sink::{EventSink, StdOutSink};

/// Collects events from nodes and the runtime and fans them out to all
/// configured sinks.
///
/// Producers hold cloned senders (see
/// [`NodeContext`](crate::node::NodeContext)); the runtime drains the
/// queue into the sinks at step boundaries via [`drain`](Self::drain).
/// An invocation is single-threaded and single-pass, so draining at
/// barriers delivers every event deterministically before `invoke`
/// returns.
pub struct EventBus {
    sinks: Arc<Mutex<Vec<Box<dyn EventSink>>>>,
    event_channel: (flume::Sender<Event>, flume::Receiver<Event>),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_sink(StdOutSink::default())
    }
}

impl EventBus {
    /// Create an event bus with a single sink.
    pub fn with_sink<T>(sink: T) -> Self
    where
        T: EventSink + 'static,
    {
        Self::with_sinks(vec![Box::new(sink)])
    }

    /// Create an event bus with multiple sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(sinks)),
            event_channel: flume::unbounded(),
        }
    }

    /// Dynamically add a sink.
    pub fn add_sink<T: EventSink + 'static>(&self, sink: T) {
        self.add_boxed_sink(Box::new(sink));
    }

    /// Dynamically add an already-boxed sink.
    pub fn add_boxed_sink(&self, sink: Box<dyn EventSink>) {
        self.sinks.lock().unwrap().push(sink);
    }

    /// Clone of the sender side so producers can emit events.
    pub fn get_sender(&self) -> flume::Sender<Event> {
        self.event_channel.0.clone()
    }

    /// Deliver every queued event to all sinks, in emission order.
    pub fn drain(&self) {
        while let Ok(event) = self.event_channel.1.try_recv() {
            let mut sinks = self.sinks.lock().unwrap();
            for sink in sinks.iter_mut() {
                if let Err(e) = sink.handle(&event) {
                    tracing::warn!(error = %e, "event sink error");
                }
            }
        }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        // Whatever is still queued goes out before the bus disappears.
        self.drain();
    }
}
