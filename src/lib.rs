//! # Mathchat: Graph-Routed Math/Chat Dispatch
//!
//! Mathchat wires a single arithmetic tool and an LLM completion client into
//! a two-branch conditional dispatch graph. One line of user input is
//! classified by a router, forwarded to exactly one handler node, and the
//! handler's textual result becomes the conversation output.
//!
//! ## Core Concepts
//!
//! - **Nodes**: Async units of work that process state snapshots
//! - **State**: A per-invocation record with a write-once output channel
//! - **Router**: Pure classification of raw input into "math" vs "chat"
//! - **Graph**: Declarative two-branch topology with one conditional edge
//! - **App**: Compiled graph that executes one pass from entry to terminal
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use mathchat::agent::conversation_app;
//! use mathchat::channels::Channel;
//! use mathchat::completion::FixedCompletion;
//! use mathchat::state::ConversationState;
//!
//! # async fn example() -> miette::Result<()> {
//! let client = Arc::new(FixedCompletion::new("Hello from the model"));
//! let app = conversation_app(client)?;
//!
//! let final_state = app
//!     .invoke(ConversationState::new_with_input("10 * (2 + 3)"))
//!     .await?;
//! assert_eq!(final_state.output.snapshot().as_deref(), Some("50"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Routing Semantics
//!
//! The router checks for the literal presence of any of `+ - * / =` in the
//! raw input. This is character membership, not token-aware parsing, and it
//! is preserved exactly: "what's 2-2 cats?" routes to the math handler,
//! because that is what the system observably does. See [`router`].
//!
//! ## Error Handling
//!
//! Malformed arithmetic never aborts an invocation: the math handler
//! recovers locally, writing an `"Error in expression: ..."` diagnostic as
//! the output and recording a structured [`channels::errors::ErrorEvent`].
//! Completion-service failures are the collaborator's problem and propagate
//! as fatal node errors.
//!
//! ## Module Guide
//!
//! - [`router`] - Input classification and the routing edge predicate
//! - [`expr`] - Sanitization and safe arithmetic evaluation
//! - [`completion`] - Completion client trait, HTTP client, test double
//! - [`nodes`] - Router pass-through, math handler, chat handler
//! - [`state`] - Conversation state, snapshots, channels
//! - [`graphs`] - Graph definition and compilation
//! - [`app`] - Compiled application and the step loop
//! - [`event_bus`] - Progress events and pluggable sinks
//! - [`telemetry`] - Event and error rendering

pub mod agent;
pub mod app;
pub mod channels;
pub mod completion;
pub mod event_bus;
pub mod expr;
pub mod graphs;
pub mod node;
pub mod nodes;
pub mod router;
pub mod state;
pub mod telemetry;
pub mod types;
