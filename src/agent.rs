//! Assembly of the two-branch conversation graph.
//!
//! Topology:
//!
//! ```text
//! Start ──▶ router ──(conditional)──▶ math ──▶ End
//!                          └────────▶ chat ──▶ End
//! ```
//!
//! The router node is a pass-through; the conditional edge hanging off it
//! does the classification. Exactly one handler runs per invocation and
//! writes the output channel, after which execution terminates.

use std::sync::Arc;

use crate::app::App;
use crate::completion::CompletionClient;
use crate::graphs::{GraphBuilder, GraphCompileError};
use crate::nodes::{ChatNode, MathNode, RouterNode};
use crate::router::routing_predicate;
use crate::types::NodeKind;

/// Name of the entry pass-through node.
pub const ROUTER_NODE: &str = "router";
/// Name of the arithmetic handler node. Must match
/// [`RouteLabel::Math`](crate::router::RouteLabel)'s target.
pub const MATH_NODE: &str = "math";
/// Name of the chat handler node. Must match
/// [`RouteLabel::Chat`](crate::router::RouteLabel)'s target.
pub const CHAT_NODE: &str = "chat";

/// Build the compiled two-branch conversation app around the given
/// completion client.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mathchat::agent::conversation_app;
/// use mathchat::completion::FixedCompletion;
///
/// let app = conversation_app(Arc::new(FixedCompletion::new("hi"))).unwrap();
/// assert_eq!(app.nodes().len(), 3);
/// assert_eq!(app.conditional_edges().len(), 1);
/// ```
pub fn conversation_app(
    client: Arc<dyn CompletionClient>,
) -> Result<App, GraphCompileError> {
    GraphBuilder::new()
        .add_node(NodeKind::named(ROUTER_NODE), RouterNode)
        .add_node(NodeKind::named(MATH_NODE), MathNode)
        .add_node(NodeKind::named(CHAT_NODE), ChatNode::new(client))
        .add_edge(NodeKind::Start, NodeKind::named(ROUTER_NODE))
        .add_conditional_edge(NodeKind::named(ROUTER_NODE), routing_predicate())
        .add_edge(NodeKind::named(MATH_NODE), NodeKind::End)
        .add_edge(NodeKind::named(CHAT_NODE), NodeKind::End)
        .compile()
}
