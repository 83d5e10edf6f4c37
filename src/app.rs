//! Compiled dispatch application and its step loop.
//!
//! An [`App`] owns the graph topology produced by
//! [`GraphBuilder::compile`](crate::graphs::GraphBuilder::compile) and
//! executes one pass per [`invoke`](App::invoke): the frontier starts at
//! the static `Start` edges, each step runs the frontier's nodes and
//! applies their partial updates, conditional edges of the nodes that ran
//! choose the next frontier, and execution terminates once the frontier is
//! empty or contains only `End`.
//!
//! Execution is strictly sequential. This system models a single
//! invocation with a single logical thread of control; there is no
//! scheduler, no sessions, and nothing is persisted between invocations.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::channels::Channel;
use crate::channels::errors::{ChainedError, ErrorEvent};
use crate::event_bus::{Event, EventBus, EventSink, STREAM_END_SCOPE};
use crate::graphs::ConditionalEdge;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::ConversationState;
use crate::types::NodeKind;

/// Executable dispatch graph.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mathchat::agent::conversation_app;
/// use mathchat::completion::FixedCompletion;
/// use mathchat::state::ConversationState;
///
/// # async fn example() -> miette::Result<()> {
/// let app = conversation_app(Arc::new(FixedCompletion::new("hi")))?;
/// let final_state = app
///     .invoke(ConversationState::new_with_input("2 + 2"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct App {
    nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    edges: FxHashMap<NodeKind, Vec<NodeKind>>,
    conditional_edges: Vec<ConditionalEdge>,
}

/// Result of one superstep, mostly useful for tracing and tests.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: u64,
    pub ran_nodes: Vec<NodeKind>,
    pub updated_channels: Vec<&'static str>,
    pub next_frontier: Vec<NodeKind>,
    pub completed: bool,
}

/// Errors that abort an invocation.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The frontier was empty at entry. Compile-time validation makes
    /// this unreachable for graphs built through `GraphBuilder`, but the
    /// runtime guards anyway.
    #[error("no nodes to run from Start (empty frontier)")]
    #[diagnostic(
        code(mathchat::app::no_start_nodes),
        help("Add an edge from Start to your entry node.")
    )]
    NoStartNodes,

    /// A node returned a fatal error.
    #[error("node {kind} failed at step {step}")]
    #[diagnostic(code(mathchat::app::node_run))]
    NodeRun {
        kind: NodeKind,
        step: u64,
        #[source]
        #[diagnostic_source]
        source: NodeError,
    },
}

impl App {
    /// Internal (crate) factory keeping the topology fields private.
    pub(crate) fn from_parts(
        nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
        edges: FxHashMap<NodeKind, Vec<NodeKind>>,
        conditional_edges: Vec<ConditionalEdge>,
    ) -> Self {
        App {
            nodes,
            edges,
            conditional_edges,
        }
    }

    /// The registered executable nodes, keyed by identifier.
    #[must_use]
    pub fn nodes(&self) -> &FxHashMap<NodeKind, Arc<dyn Node>> {
        &self.nodes
    }

    /// The unconditional edges of the graph.
    #[must_use]
    pub fn edges(&self) -> &FxHashMap<NodeKind, Vec<NodeKind>> {
        &self.edges
    }

    /// The conditional edges of the graph.
    #[must_use]
    pub fn conditional_edges(&self) -> &[ConditionalEdge] {
        &self.conditional_edges
    }

    /// Execute one pass from entry to terminal with the default event bus
    /// (stdout sink).
    #[instrument(skip(self, initial_state), err)]
    pub async fn invoke(
        &self,
        initial_state: ConversationState,
    ) -> Result<ConversationState, RunnerError> {
        self.invoke_with_bus(initial_state, EventBus::default())
            .await
    }

    /// Execute one pass, streaming events to the given sinks instead of
    /// (or in addition to) stdout.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use mathchat::event_bus::MemorySink;
    /// use mathchat::state::ConversationState;
    /// # async fn example(app: mathchat::app::App) -> miette::Result<()> {
    /// let sink = MemorySink::new();
    /// let final_state = app
    ///     .invoke_with_sinks(
    ///         ConversationState::new_with_input("2 + 2"),
    ///         vec![Box::new(sink.clone())],
    ///     )
    ///     .await?;
    /// for event in sink.snapshot() {
    ///     println!("{event}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, initial_state, sinks), err)]
    pub async fn invoke_with_sinks(
        &self,
        initial_state: ConversationState,
        sinks: Vec<Box<dyn EventSink>>,
    ) -> Result<ConversationState, RunnerError> {
        self.invoke_with_bus(initial_state, EventBus::with_sinks(sinks))
            .await
    }

    async fn invoke_with_bus(
        &self,
        mut state: ConversationState,
        bus: EventBus,
    ) -> Result<ConversationState, RunnerError> {
        let invocation_id = Uuid::new_v4();
        let emitter = bus.get_sender();
        let _ = emitter.send(Event::diagnostic(
            "run_start",
            format!("invocation={invocation_id}"),
        ));
        tracing::info!(invocation = %invocation_id, input = %state.input, "invocation started");

        let mut frontier = self
            .edges
            .get(&NodeKind::Start)
            .cloned()
            .unwrap_or_default();
        if frontier.is_empty() {
            return Err(RunnerError::NoStartNodes);
        }

        let mut step: u64 = 0;
        while !(frontier.is_empty() || frontier.iter().all(NodeKind::is_end)) {
            step += 1;
            let report = self.run_superstep(&mut state, &frontier, step, &emitter).await;
            bus.drain();
            let report = match report {
                Ok(report) => report,
                Err(err) => {
                    let _ = emitter.send(Event::diagnostic(
                        STREAM_END_SCOPE,
                        format!("invocation={invocation_id} status=error step={step} error={err}"),
                    ));
                    bus.drain();
                    return Err(err);
                }
            };
            tracing::debug!(
                step,
                ran = ?report.ran_nodes,
                updated = ?report.updated_channels,
                next = ?report.next_frontier,
                "superstep applied"
            );
            frontier = report.next_frontier;
        }

        let _ = emitter.send(Event::diagnostic(
            STREAM_END_SCOPE,
            format!("invocation={invocation_id} status=completed step={step}"),
        ));
        bus.drain();
        tracing::info!(invocation = %invocation_id, step, "invocation completed");
        Ok(state)
    }

    /// Run every node in the frontier sequentially, apply their partials,
    /// and resolve the next frontier.
    async fn run_superstep(
        &self,
        state: &mut ConversationState,
        frontier: &[NodeKind],
        step: u64,
        emitter: &flume::Sender<Event>,
    ) -> Result<StepReport, RunnerError> {
        let snapshot = state.snapshot();
        let mut ran_nodes: Vec<NodeKind> = Vec::new();
        let mut partials: Vec<NodePartial> = Vec::new();

        for kind in frontier {
            if kind.is_end() || kind.is_start() {
                continue;
            }
            let Some(node) = self.nodes.get(kind) else {
                // Frontier targets are validated when the frontier is
                // built; a miss here is a bug.
                tracing::warn!(step, node = %kind, "frontier node not registered; skipping");
                continue;
            };

            let ctx = NodeContext {
                node_id: kind.to_string(),
                step,
                events: emitter.clone(),
            };
            match node.run(snapshot.clone(), ctx).await {
                Ok(partial) => {
                    ran_nodes.push(kind.clone());
                    partials.push(partial);
                }
                Err(source) => {
                    // Record the failure on the errors channel before
                    // aborting.
                    let event = ErrorEvent::node(
                        kind.to_string(),
                        step,
                        ChainedError::msg(source.to_string()),
                    )
                    .with_tag("fatal");
                    state.errors.get_mut().push(event);
                    let errors_version = state.errors.version();
                    state.errors.set_version(errors_version.saturating_add(1));
                    return Err(RunnerError::NodeRun {
                        kind: kind.clone(),
                        step,
                        source,
                    });
                }
            }
        }

        let updated_channels = self.apply_partials(state, &ran_nodes, partials);
        let next_frontier = self.next_frontier(state, &ran_nodes, step);
        let completed =
            next_frontier.is_empty() || next_frontier.iter().all(NodeKind::is_end);

        Ok(StepReport {
            step,
            ran_nodes,
            updated_channels,
            next_frontier,
            completed,
        })
    }

    /// Merge node partials into the state, bumping channel versions only
    /// when content actually changed.
    fn apply_partials(
        &self,
        state: &mut ConversationState,
        ran_nodes: &[NodeKind],
        partials: Vec<NodePartial>,
    ) -> Vec<&'static str> {
        let mut output_update: Option<String> = None;
        let mut errors_all: Vec<ErrorEvent> = Vec::new();

        for (i, partial) in partials.into_iter().enumerate() {
            let origin = ran_nodes.get(i);
            if let Some(output) = partial.output {
                if output_update.is_some() {
                    tracing::warn!(
                        node = ?origin,
                        "multiple outputs produced in one step; last write wins"
                    );
                }
                output_update = Some(output);
            }
            if let Some(errors) = partial.errors {
                if !errors.is_empty() {
                    tracing::debug!(node = ?origin, count = errors.len(), "node produced errors");
                    errors_all.extend(errors);
                }
            }
        }

        let mut updated: Vec<&'static str> = Vec::new();

        if let Some(output) = output_update {
            if state.output.is_set() {
                // Violates the write-once invariant; warn, last write wins.
                tracing::warn!("output channel already set; overwriting");
            }
            let version = state.output.version();
            *state.output.get_mut() = Some(output);
            state.output.set_version(version.saturating_add(1));
            tracing::info!(
                channel = "output",
                version = state.output.version(),
                "channel updated"
            );
            updated.push("output");
        }

        if !errors_all.is_empty() {
            let version = state.errors.version();
            state.errors.get_mut().extend(errors_all);
            state.errors.set_version(version.saturating_add(1));
            tracing::info!(
                channel = "errors",
                count = state.errors.len(),
                version = state.errors.version(),
                "channel updated"
            );
            updated.push("errors");
        }

        updated
    }

    /// Resolve the next frontier from static edges plus the conditional
    /// edges of the nodes that ran.
    fn next_frontier(
        &self,
        state: &ConversationState,
        ran_nodes: &[NodeKind],
        step: u64,
    ) -> Vec<NodeKind> {
        let snapshot = state.snapshot();
        let mut next_frontier: Vec<NodeKind> = Vec::new();

        for id in ran_nodes {
            let mut targets: Vec<NodeKind> =
                self.edges.get(id).cloned().unwrap_or_default();

            for edge in self.conditional_edges.iter().filter(|ce| ce.from() == id) {
                let target_names = (edge.predicate())(snapshot.clone());
                for name in target_names {
                    let target = match name.as_str() {
                        "End" => NodeKind::End,
                        "Start" => NodeKind::Start,
                        other => NodeKind::Custom(other.to_string()),
                    };
                    tracing::debug!(from = %id, to = %target, step, "conditional edge routed");
                    targets.push(target);
                }
            }

            for target in targets {
                let valid = match &target {
                    NodeKind::End | NodeKind::Start => true,
                    NodeKind::Custom(_) => self.nodes.contains_key(&target),
                };
                if !valid {
                    tracing::warn!(step, from = %id, to = %target, "frontier target not found; skipping");
                    continue;
                }
                if !next_frontier.contains(&target) {
                    next_frontier.push(target);
                }
            }
        }

        next_frontier
    }
}
