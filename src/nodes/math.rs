//! Arithmetic handler: sanitize, evaluate, recover locally.

use async_trait::async_trait;
use serde_json::json;

use crate::channels::errors::{ChainedError, ErrorEvent};
use crate::expr::{evaluate, sanitize};
use crate::node::{Node, NodeContext, NodeError, NodePartial};
use crate::state::StateSnapshot;

/// Handler for inputs the router classified as arithmetic.
///
/// Evaluates the sanitized input and writes the stringified numeric result
/// to the output channel. A malformed expression is never fatal: the
/// output becomes `"Error in expression: <details>"` and a structured
/// [`ErrorEvent`] is recorded alongside it, so the invocation always
/// completes with some textual output.
#[derive(Debug, Clone, Default)]
pub struct MathNode;

#[async_trait]
impl Node for MathNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodePartial, NodeError> {
        ctx.emit("math", format!("evaluating `{}`", snapshot.input))?;

        match evaluate(&snapshot.input) {
            Ok(value) => {
                let rendered = value.to_string();
                ctx.emit("math", format!("result {rendered}"))?;
                Ok(NodePartial::new().with_output(rendered))
            }
            Err(err) => {
                let rendered = format!("Error in expression: {err}");
                ctx.emit("math", rendered.clone())?;
                let event = ErrorEvent::node(
                    ctx.node_id.clone(),
                    ctx.step,
                    ChainedError::msg(rendered.clone())
                        .with_details(json!({ "sanitized": sanitize(&snapshot.input) })),
                )
                .with_tag("expression");
                Ok(NodePartial::new()
                    .with_output(rendered)
                    .with_errors(vec![event]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConversationState;

    fn ctx() -> (NodeContext, flume::Receiver<crate::event_bus::Event>) {
        let (tx, rx) = flume::unbounded();
        (
            NodeContext {
                node_id: "math".to_string(),
                step: 2,
                events: tx,
            },
            rx,
        )
    }

    #[tokio::test]
    async fn well_formed_expression_produces_result() {
        let (ctx, _rx) = ctx();
        let snapshot = ConversationState::new_with_input("4 + 5 * 2").snapshot();
        let partial = MathNode.run(snapshot, ctx).await.unwrap();
        assert_eq!(partial.output.as_deref(), Some("14"));
        assert!(partial.errors.is_none());
    }

    #[tokio::test]
    async fn malformed_expression_recovers_with_diagnostic() {
        let (ctx, _rx) = ctx();
        let snapshot = ConversationState::new_with_input("2 +").snapshot();
        let partial = MathNode.run(snapshot, ctx).await.unwrap();
        let output = partial.output.unwrap();
        assert!(output.starts_with("Error in expression:"), "{output}");
        let errors = partial.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].tags.contains(&"expression".to_string()));
    }

    #[tokio::test]
    async fn rerunning_same_input_is_idempotent() {
        let snapshot = ConversationState::new_with_input("(2+3)*4").snapshot();
        let (ctx_a, _rx_a) = ctx();
        let (ctx_b, _rx_b) = ctx();
        let first = MathNode.run(snapshot.clone(), ctx_a).await.unwrap();
        let second = MathNode.run(snapshot, ctx_b).await.unwrap();
        assert_eq!(first.output, second.output);
    }
}
