//! The three nodes of the dispatch graph.
//!
//! - [`RouterNode`]: pass-through entry point; its outgoing conditional
//!   edge performs the actual classification
//! - [`MathNode`]: sanitizes and evaluates arithmetic, recovering locally
//!   from malformed expressions
//! - [`ChatNode`]: forwards the raw input to an injected completion client

mod chat;
mod math;
mod router;

pub use chat::ChatNode;
pub use math::MathNode;
pub use router::RouterNode;
