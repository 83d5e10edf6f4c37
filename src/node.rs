//! Node execution contract for the dispatch graph.
//!
//! A node is a single unit of work: it receives an immutable
//! [`StateSnapshot`] plus an execution context and returns a
//! [`NodePartial`] describing the state changes it wants applied.
//!
//! # Error Handling
//!
//! Nodes have two error tiers:
//! 1. **Fatal**: return `Err(NodeError)` to abort the invocation (e.g. the
//!    completion service failed).
//! 2. **Recoverable**: put [`ErrorEvent`]s into `NodePartial.errors` and
//!    return `Ok` (e.g. a malformed arithmetic expression, which still
//!    produces textual output).

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::channels::errors::ErrorEvent;
use crate::event_bus::Event;
use crate::state::StateSnapshot;

/// Core trait for executable dispatch-graph nodes.
///
/// Implementations should be stateless and deterministic where the domain
/// allows; anything a node needs beyond the snapshot (such as a completion
/// client) is injected at construction.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use mathchat::node::{Node, NodeContext, NodeError, NodePartial};
/// use mathchat::state::StateSnapshot;
///
/// struct UppercaseNode;
///
/// #[async_trait]
/// impl Node for UppercaseNode {
///     async fn run(
///         &self,
///         snapshot: StateSnapshot,
///         ctx: NodeContext,
///     ) -> Result<NodePartial, NodeError> {
///         ctx.emit("uppercase", "transforming input")?;
///         Ok(NodePartial::new().with_output(snapshot.input.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// Execute this node against the given snapshot.
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError>;
}

/// Execution context handed to a node for one step.
#[derive(Clone, Debug)]
pub struct NodeContext {
    /// Name of the node instance being executed.
    pub node_id: String,
    /// Current step number within the invocation.
    pub step: u64,
    /// Sender half of the invocation's event bus.
    pub events: flume::Sender<Event>,
}

impl NodeContext {
    /// Emit a node-scoped event enriched with this context's metadata.
    pub fn emit(
        &self,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), NodeContextError> {
        self.events
            .send(Event::node_message_with_meta(
                self.node_id.clone(),
                self.step,
                scope,
                message,
            ))
            .map_err(|_| NodeContextError::EventBusUnavailable)
    }
}

/// Partial state update returned by node execution.
///
/// Both fields are optional; the runtime merges whatever is present into
/// the conversation state at the end of the step.
#[derive(Clone, Debug, Default)]
pub struct NodePartial {
    /// Textual result to write to the output channel.
    pub output: Option<String>,
    /// Recoverable error events to append to the errors channel.
    pub errors: Option<Vec<ErrorEvent>>,
}

impl NodePartial {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an output value.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Attach recoverable error events.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<ErrorEvent>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Errors that can occur when using [`NodeContext`] methods.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeContextError {
    /// Event could not be sent because the bus is gone.
    #[error("failed to emit event: event bus unavailable")]
    #[diagnostic(
        code(mathchat::node::event_bus_unavailable),
        help("The event bus may have been dropped already.")
    )]
    EventBusUnavailable,
}

/// Fatal errors that halt the invocation.
///
/// For recoverable problems use `NodePartial.errors` instead.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// External provider or service failure.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(mathchat::node::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Event bus communication error.
    #[error("event bus error: {0}")]
    #[diagnostic(code(mathchat::node::event_bus))]
    EventBus(#[from] NodeContextError),
}
