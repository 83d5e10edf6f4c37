use chrono::{TimeZone, Utc};
use serde_json::json;

use mathchat::channels::errors::*;
use mathchat::telemetry::FormatterMode;

/********************
 * ChainedError
 ********************/

#[test]
fn chained_error_msg_and_chain() {
    let base = ChainedError::msg("root cause").with_details(json!({"k":"v"}));
    let wrapped = ChainedError::msg("top").with_cause(base.clone());

    assert_eq!(base.message, "root cause");
    assert_eq!(wrapped.message, "top");
    assert_eq!(wrapped.cause.as_ref().unwrap().message, base.message);
    assert_eq!(base.details, json!({"k":"v"}));
}

#[test]
fn chained_error_serde_roundtrip() {
    let err = ChainedError::msg("boom")
        .with_details(json!({"code": 500}))
        .with_cause(ChainedError::msg("inner"));

    let ser = serde_json::to_string(&err).expect("serialize");
    let de: ChainedError = serde_json::from_str(&ser).expect("deserialize");
    assert_eq!(de, err);
}

/********************
 * ErrorScope
 ********************/

#[test]
fn error_scope_variants_serialize_tagged() {
    let node = ErrorScope::Node {
        kind: "math".into(),
        step: 2,
    };
    let ser_node = serde_json::to_value(&node).unwrap();
    assert_eq!(ser_node["scope"], "node");
    assert_eq!(ser_node["kind"], "math");
    assert_eq!(ser_node["step"], 2);

    let run = ErrorScope::Runner { step: 7 };
    let ser_run = serde_json::to_value(&run).unwrap();
    assert_eq!(ser_run["scope"], "runner");

    let app = ErrorScope::App;
    let ser_app = serde_json::to_value(&app).unwrap();
    assert_eq!(ser_app["scope"], "app");

    assert_eq!(serde_json::from_value::<ErrorScope>(ser_node).unwrap(), node);
    assert_eq!(serde_json::from_value::<ErrorScope>(ser_run).unwrap(), run);
    assert_eq!(serde_json::from_value::<ErrorScope>(ser_app).unwrap(), app);
}

/********************
 * ErrorEvent
 ********************/

#[test]
fn error_event_roundtrip() {
    let when = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let ev = ErrorEvent {
        when,
        scope: ErrorScope::App,
        error: ChainedError::msg("oops"),
        tags: vec!["t1".into(), "t2".into()],
        context: json!({"info": true}),
    };

    let ser = serde_json::to_string(&ev).unwrap();
    let de: ErrorEvent = serde_json::from_str(&ser).unwrap();
    assert_eq!(de, ev);
}

#[test]
fn error_event_defaults_are_empty_when_missing() {
    let when = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let v = json!({
        "when": when,
        "scope": {"scope": "app"},
        "error": {"message":"x"}
    });
    let de: ErrorEvent = serde_json::from_value(v).unwrap();
    assert!(de.tags.is_empty());
    assert!(de.context.is_null());
}

#[test]
fn node_constructor_carries_origin() {
    let err = ErrorEvent::node("math", 2, ChainedError::msg("parse failed"))
        .with_tag("expression")
        .with_context(json!({"line": 1}));

    match &err.scope {
        ErrorScope::Node { kind, step } => {
            assert_eq!(kind, "math");
            assert_eq!(*step, 2);
        }
        other => panic!("expected node scope, got {other:?}"),
    }
    assert_eq!(err.tags, vec!["expression".to_string()]);
    assert_eq!(err.context, json!({"line": 1}));
}

/********************
 * Rendering
 ********************/

#[test]
fn pretty_print_plain_has_no_ansi_codes() {
    let events = vec![
        ErrorEvent::node("math", 2, ChainedError::msg("Error in expression: division by zero"))
            .with_tag("expression"),
        ErrorEvent::runner(3, ChainedError::msg("downstream").with_cause(ChainedError::msg("upstream"))),
    ];

    let rendered = pretty_print_with_mode(&events, FormatterMode::Plain);
    assert!(!rendered.contains("\x1b["));
    assert!(rendered.contains("error: Error in expression: division by zero"));
    assert!(rendered.contains("cause: upstream"));
    assert!(rendered.contains("tags: [\"expression\"]"));
}

#[test]
fn pretty_print_colored_wraps_messages() {
    let events = vec![ErrorEvent::app(ChainedError::msg("boom"))];
    let rendered = pretty_print_with_mode(&events, FormatterMode::Colored);
    assert!(rendered.contains("\x1b["));
    assert!(rendered.contains("boom"));
}
