//! Minimal end-to-end check: a single-node graph runs to completion.

mod common;

use common::StaticReplyNode;
use mathchat::channels::Channel;
use mathchat::graphs::GraphBuilder;
use mathchat::state::ConversationState;
use mathchat::types::NodeKind;

#[tokio::test]
async fn single_node_graph_runs_to_completion() {
    let app = GraphBuilder::new()
        .add_node(
            NodeKind::named("greet"),
            StaticReplyNode::new("graph dispatch is working"),
        )
        .add_edge(NodeKind::Start, NodeKind::named("greet"))
        .add_edge(NodeKind::named("greet"), NodeKind::End)
        .compile()
        .unwrap();

    let final_state = app
        .invoke(ConversationState::new_with_input("hello from the smoke test"))
        .await
        .unwrap();

    assert_eq!(
        final_state.output.snapshot().as_deref(),
        Some("graph dispatch is working")
    );
    assert_eq!(final_state.input, "hello from the smoke test");
}
