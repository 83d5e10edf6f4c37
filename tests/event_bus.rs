use mathchat::event_bus::{Event, EventBus, MemorySink};

#[test]
fn drain_delivers_events_in_emission_order() {
    let sink = MemorySink::new();
    let bus = EventBus::with_sink(sink.clone());

    let tx = bus.get_sender();
    tx.send(Event::node_message("work", "first")).unwrap();
    tx.send(Event::diagnostic("runtime", "second")).unwrap();
    bus.drain();

    let events = sink.snapshot();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].message(), "first");
    assert_eq!(events[1].message(), "second");
}

#[test]
fn sinks_added_later_receive_subsequent_events() {
    let first = MemorySink::new();
    let bus = EventBus::with_sink(first.clone());
    let tx = bus.get_sender();

    tx.send(Event::diagnostic("runtime", "early")).unwrap();
    bus.drain();

    let second = MemorySink::new();
    bus.add_sink(second.clone());
    tx.send(Event::diagnostic("runtime", "late")).unwrap();
    bus.drain();

    assert_eq!(first.snapshot().len(), 2);
    assert_eq!(second.snapshot().len(), 1);
    assert_eq!(second.snapshot()[0].message(), "late");
}

#[test]
fn dropping_the_bus_flushes_queued_events() {
    let sink = MemorySink::new();
    {
        let bus = EventBus::with_sink(sink.clone());
        bus.get_sender()
            .send(Event::diagnostic("runtime", "queued"))
            .unwrap();
        // No explicit drain before the bus goes away.
    }
    assert_eq!(sink.snapshot().len(), 1);
}

#[test]
fn display_includes_node_metadata_when_present() {
    let with_meta = Event::node_message_with_meta("math", 2, "math", "result 14");
    assert_eq!(with_meta.to_string(), "[math@2] result 14");

    let bare = Event::node_message("math", "no metadata");
    assert_eq!(bare.to_string(), "no metadata");

    let diag = Event::diagnostic("runtime", "invocation started");
    assert_eq!(diag.to_string(), "invocation started");
}

#[test]
fn events_round_trip_through_serde() {
    let event = Event::node_message_with_meta("chat", 3, "chat", "received 42 chars");
    let json = serde_json::to_string(&event).unwrap();
    let parsed: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn memory_sink_clear_empties_the_snapshot() {
    let sink = MemorySink::new();
    let bus = EventBus::with_sink(sink.clone());
    bus.get_sender()
        .send(Event::diagnostic("runtime", "x"))
        .unwrap();
    bus.drain();

    assert_eq!(sink.snapshot().len(), 1);
    sink.clear();
    assert!(sink.snapshot().is_empty());
}
