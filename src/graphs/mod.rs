//! Graph definition and compilation.
//!
//! [`GraphBuilder`] assembles executable nodes, static edges, and
//! conditional edges, then [`compile`](GraphBuilder::compile)s them into an
//! [`App`](crate::app::App). `NodeKind::Start` and `NodeKind::End` are
//! virtual endpoints used only for topology.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use mathchat::graphs::{EdgePredicate, GraphBuilder};
//! use mathchat::types::NodeKind;
//!
//! # struct EchoNode;
//! # #[async_trait::async_trait]
//! # impl mathchat::node::Node for EchoNode {
//! #     async fn run(&self, snapshot: mathchat::state::StateSnapshot, _: mathchat::node::NodeContext) -> Result<mathchat::node::NodePartial, mathchat::node::NodeError> {
//! #         Ok(mathchat::node::NodePartial::new().with_output(snapshot.input))
//! #     }
//! # }
//! // Route everything to one node via a conditional edge.
//! let always_echo: EdgePredicate = Arc::new(|_snapshot| vec!["echo".to_string()]);
//!
//! let app = GraphBuilder::new()
//!     .add_node(NodeKind::named("entry"), EchoNode)
//!     .add_node(NodeKind::named("echo"), EchoNode)
//!     .add_edge(NodeKind::Start, NodeKind::named("entry"))
//!     .add_conditional_edge(NodeKind::named("entry"), always_echo)
//!     .add_edge(NodeKind::named("echo"), NodeKind::End)
//!     .compile()
//!     .unwrap();
//! ```

mod builder;
mod compilation;
mod edges;

pub use builder::GraphBuilder;
pub use compilation::GraphCompileError;
pub use edges::{ConditionalEdge, EdgePredicate};
