#![allow(dead_code)]

use async_trait::async_trait;

use mathchat::node::{Node, NodeContext, NodeError, NodePartial};
use mathchat::state::{ConversationState, StateSnapshot};

/// Node that does nothing, for topology-only tests.
#[derive(Debug, Clone)]
pub struct NoopNode;

#[async_trait]
impl Node for NoopNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::default())
    }
}

/// Node that writes a fixed reply to the output channel.
#[derive(Debug, Clone)]
pub struct StaticReplyNode {
    pub msg: &'static str,
}

impl StaticReplyNode {
    pub fn new(msg: &'static str) -> Self {
        Self { msg }
    }
}

#[async_trait]
impl Node for StaticReplyNode {
    async fn run(
        &self,
        _snapshot: StateSnapshot,
        _ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        Ok(NodePartial::new().with_output(self.msg))
    }
}

pub fn empty_snapshot() -> StateSnapshot {
    ConversationState::builder().build().snapshot()
}

pub fn snapshot_with_input(input: &str) -> StateSnapshot {
    ConversationState::new_with_input(input).snapshot()
}
