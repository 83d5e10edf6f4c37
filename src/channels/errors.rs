//! Structured error events recorded on the conversation state.
//!
//! Recoverable problems (a malformed arithmetic expression) and fatal node
//! failures both leave an [`ErrorEvent`] on the errors channel, so the
//! final state always tells the whole story of an invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry::{FormatterMode, PlainFormatter, TelemetryFormatter};

/// An error event with scope, error details, tags, and free-form context.
///
/// # JSON Serialization Format
///
/// ```json
/// {
///   "when": "2025-11-02T10:30:00Z",
///   "scope": { "scope": "node", "kind": "math", "step": 2 },
///   "error": {
///     "message": "Error in expression: division by zero",
///     "cause": null,
///     "details": { "sanitized": "2/0" }
///   },
///   "tags": ["expression"],
///   "context": null
/// }
/// ```
///
/// The `scope` field is a tagged union with discriminator `"scope"`:
/// `"node"` (requires `kind` and `step`), `"runner"` (requires `step`),
/// or `"app"`.
///
/// # Examples
///
/// ```
/// use mathchat::channels::errors::{ChainedError, ErrorEvent};
/// use serde_json::json;
///
/// let event = ErrorEvent::node("math", 2, ChainedError::msg("bad expression"))
///     .with_tag("expression")
///     .with_context(json!({"input": "2 +"}));
/// let json_str = serde_json::to_string(&event).unwrap();
/// assert!(json_str.contains("\"scope\":\"node\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ErrorEvent {
    #[serde(default = "chrono::Utc::now")]
    pub when: DateTime<Utc>,
    #[serde(default)]
    pub scope: ErrorScope,
    #[serde(default)]
    pub error: ChainedError,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub context: serde_json::Value,
}

impl ErrorEvent {
    /// Create a node-scoped error event.
    pub fn node<S: Into<String>>(kind: S, step: u64, error: ChainedError) -> Self {
        Self {
            when: Utc::now(),
            scope: ErrorScope::Node {
                kind: kind.into(),
                step,
            },
            error,
            tags: Vec::new(),
            context: serde_json::Value::Null,
        }
    }

    /// Create a runner-scoped error event.
    pub fn runner(step: u64, error: ChainedError) -> Self {
        Self {
            when: Utc::now(),
            scope: ErrorScope::Runner { step },
            error,
            tags: Vec::new(),
            context: serde_json::Value::Null,
        }
    }

    /// Create an app-scoped error event.
    pub fn app(error: ChainedError) -> Self {
        Self {
            when: Utc::now(),
            scope: ErrorScope::App,
            error,
            tags: Vec::new(),
            context: serde_json::Value::Null,
        }
    }

    /// Add a single tag to this error event.
    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add context metadata to this error event.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

/// Where in the invocation an error event originated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ErrorScope {
    Node {
        kind: String,
        step: u64,
    },
    Runner {
        step: u64,
    },
    #[default]
    App,
}

/// An error message with an optional cause chain and JSON details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainedError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ChainedError>>,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl Default for ChainedError {
    fn default() -> Self {
        ChainedError {
            message: String::new(),
            cause: None,
            details: serde_json::Value::Null,
        }
    }
}

impl std::fmt::Display for ChainedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ChainedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|c| c as &dyn std::error::Error)
    }
}

impl ChainedError {
    pub fn msg<M: Into<String>>(m: M) -> Self {
        ChainedError {
            message: m.into(),
            cause: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn with_cause(mut self, cause: ChainedError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// Format error events with explicit color mode control.
///
/// [`FormatterMode::Auto`] detects TTY capability on stderr;
/// [`FormatterMode::Colored`] and [`FormatterMode::Plain`] force the choice.
pub fn pretty_print_with_mode(events: &[ErrorEvent], mode: FormatterMode) -> String {
    let formatter = PlainFormatter::with_mode(mode);
    let renders = formatter.render_errors(events);
    let mut out = String::new();
    for (idx, render) in renders.into_iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        for line in render.lines {
            out.push_str(&line);
        }
    }
    out
}

/// Format error events as human-readable text with auto-detected color.
pub fn pretty_print(events: &[ErrorEvent]) -> String {
    pretty_print_with_mode(events, FormatterMode::Auto)
}
