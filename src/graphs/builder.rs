//! GraphBuilder: fluent construction of dispatch graphs.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::edges::{ConditionalEdge, EdgePredicate};
use crate::node::Node;
use crate::types::NodeKind;

/// Builder for dispatch graphs.
///
/// A graph is assembled from executable nodes, unconditional edges, and
/// conditional edges, then turned into an executable
/// [`App`](crate::app::App) by [`compile`](Self::compile).
///
/// # Required Configuration
///
/// - at least one edge must originate from `NodeKind::Start` (the entry)
/// - edges to `NodeKind::End` define exit points
///
/// `Start` and `End` are virtual endpoints: they exist only for topology
/// and must never be registered with [`add_node`](Self::add_node).
///
/// # Examples
///
/// ```
/// use mathchat::graphs::GraphBuilder;
/// use mathchat::types::NodeKind;
///
/// # struct EchoNode;
/// # #[async_trait::async_trait]
/// # impl mathchat::node::Node for EchoNode {
/// #     async fn run(&self, snapshot: mathchat::state::StateSnapshot, _: mathchat::node::NodeContext) -> Result<mathchat::node::NodePartial, mathchat::node::NodeError> {
/// #         Ok(mathchat::node::NodePartial::new().with_output(snapshot.input))
/// #     }
/// # }
/// let app = GraphBuilder::new()
///     .add_node(NodeKind::named("echo"), EchoNode)
///     .add_edge(NodeKind::Start, NodeKind::named("echo"))
///     .add_edge(NodeKind::named("echo"), NodeKind::End)
///     .compile()
///     .unwrap();
/// ```
pub struct GraphBuilder {
    /// Registry of all executable nodes, keyed by their identifier.
    pub nodes: FxHashMap<NodeKind, Arc<dyn Node>>,
    /// Unconditional edges defining the static topology.
    pub edges: FxHashMap<NodeKind, Vec<NodeKind>>,
    /// Conditional edges for routing based on state.
    pub conditional_edges: Vec<ConditionalEdge>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new, empty graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
            edges: FxHashMap::default(),
            conditional_edges: Vec::new(),
        }
    }

    /// Register an executable node under the given identifier.
    ///
    /// `NodeKind::Start` and `NodeKind::End` are virtual; attempts to
    /// register them are ignored with a warning.
    #[must_use]
    pub fn add_node(mut self, id: NodeKind, node: impl Node + 'static) -> Self {
        match id {
            NodeKind::Start | NodeKind::End => {
                tracing::warn!(
                    ?id,
                    "ignoring registration of virtual node kind (Start/End are virtual)"
                );
            }
            _ => {
                self.nodes.insert(id, Arc::new(node));
            }
        }
        self
    }

    /// Add an unconditional edge between two nodes.
    #[must_use]
    pub fn add_edge(mut self, from: NodeKind, to: NodeKind) -> Self {
        self.edges.entry(from).or_default().push(to);
        self
    }

    /// Add a conditional edge from `from`, routed by `predicate`.
    ///
    /// When `from` finishes executing, the predicate is evaluated against
    /// the current state snapshot and its returned node names become the
    /// next frontier targets.
    #[must_use]
    pub fn add_conditional_edge(mut self, from: NodeKind, predicate: EdgePredicate) -> Self {
        self.conditional_edges
            .push(ConditionalEdge::new(from, predicate));
        self
    }
}
