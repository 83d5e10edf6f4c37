//! Chat handler: forward the input to the completion client verbatim.

use std::sync::Arc;

use async_trait::async_trait;

use crate::completion::CompletionClient;
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::StateSnapshot;

/// Handler for inputs the router classified as general chat.
///
/// Forwards the raw input to the injected [`CompletionClient`] and passes
/// the response through unmodified. Service failures are the
/// collaborator's concern: the node performs no retry or recovery and
/// propagates them as fatal [`NodeError::Provider`] errors.
#[derive(Clone)]
pub struct ChatNode {
    client: Arc<dyn CompletionClient>,
}

impl ChatNode {
    /// Build a chat node around an explicit completion client.
    ///
    /// The client is a constructor argument rather than process-global
    /// state, so tests and alternative deployments can swap it freely.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Node for ChatNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        ctx.emit("chat", "forwarding input to completion service")?;

        let reply = self
            .client
            .complete(&snapshot.input)
            .await
            .map_err(|e| NodeError::Provider {
                provider: "completion",
                message: e.to_string(),
            })?;

        ctx.emit("chat", format!("received {} chars", reply.len()))?;
        Ok(NodePartial::new().with_output(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, FixedCompletion};
    use crate::state::ConversationState;

    struct RefusingCompletion;

    #[async_trait]
    impl CompletionClient for RefusingCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }

    fn ctx() -> (NodeContext, flume::Receiver<crate::event_bus::Event>) {
        let (tx, rx) = flume::unbounded();
        (
            NodeContext {
                node_id: "chat".to_string(),
                step: 2,
                events: tx,
            },
            rx,
        )
    }

    #[tokio::test]
    async fn forwards_reply_verbatim() {
        let (ctx, _rx) = ctx();
        let node = ChatNode::new(Arc::new(FixedCompletion::new("  spaced reply  ")));
        let snapshot = ConversationState::new_with_input("hello there").snapshot();
        let partial = node.run(snapshot, ctx).await.unwrap();
        assert_eq!(partial.output.as_deref(), Some("  spaced reply  "));
    }

    #[tokio::test]
    async fn service_failure_is_fatal() {
        let (ctx, _rx) = ctx();
        let node = ChatNode::new(Arc::new(RefusingCompletion));
        let snapshot = ConversationState::new_with_input("hello there").snapshot();
        let err = node.run(snapshot, ctx).await.unwrap_err();
        assert!(matches!(err, NodeError::Provider { provider: "completion", .. }));
    }
}
