//! Pass-through entry node carrying the routing conditional edge.

use async_trait::async_trait;

use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::router::RouteLabel;
use crate::state::StateSnapshot;

/// The graph's entry node.
///
/// Does not modify state: classification lives in the conditional edge
/// attached to this node (see [`routing_predicate`](crate::router::routing_predicate)),
/// mirroring the pass-through router of the original wiring. The node
/// still emits the routing decision as a progress event so the choice is
/// observable.
#[derive(Debug, Clone, Default)]
pub struct RouterNode;

#[async_trait]
impl Node for RouterNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        let label = RouteLabel::of(&snapshot.input);
        ctx.emit("route", format!("classified input as {label}"))?;
        Ok(NodePartial::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConversationState;

    #[tokio::test]
    async fn router_node_passes_state_through() {
        let (tx, rx) = flume::unbounded();
        let ctx = NodeContext {
            node_id: "router".to_string(),
            step: 1,
            events: tx,
        };
        let snapshot = ConversationState::new_with_input("2 + 2").snapshot();

        let partial = RouterNode.run(snapshot, ctx).await.unwrap();
        assert!(partial.output.is_none());
        assert!(partial.errors.is_none());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.scope_label(), Some("route"));
        assert!(event.message().contains("math"));
    }
}
