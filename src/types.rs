//! Core identity types for the dispatch graph.
//!
//! [`NodeKind`] names the participants in a workflow graph. `Start` and
//! `End` are virtual structural endpoints: they anchor edges but are never
//! registered or executed. Every executable node is a `Custom` kind with a
//! user-chosen name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a node within a dispatch graph.
///
/// # Examples
///
/// ```rust
/// use mathchat::types::NodeKind;
///
/// let start = NodeKind::Start;
/// let math = NodeKind::Custom("math".to_string());
/// assert!(start.is_start());
/// assert!(math.is_custom());
/// assert_eq!(math.to_string(), "math");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Virtual entry point. Has no implementation; the first edge of every
    /// graph must originate here.
    Start,

    /// Virtual terminal. Has no implementation; a frontier consisting only
    /// of `End` completes the invocation.
    End,

    /// Executable node identified by a user-defined name, unique within
    /// the graph.
    Custom(String),
}

impl NodeKind {
    /// Convenience constructor for custom nodes.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        NodeKind::Custom(name.into())
    }

    /// Returns `true` if this is the virtual [`Start`](Self::Start) node.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns `true` if this is the virtual [`End`](Self::End) node.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// Returns `true` if this is an executable custom node.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::End => write!(f, "End"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

// Developer experience: allow string literals where a NodeKind is expected.
impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        match s {
            "Start" => NodeKind::Start,
            "End" => NodeKind::End,
            other => NodeKind::Custom(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_from_agree() {
        assert_eq!(NodeKind::named("math"), NodeKind::from("math"));
        assert_eq!(NodeKind::from("Start"), NodeKind::Start);
        assert_eq!(NodeKind::from("End"), NodeKind::End);
    }

    #[test]
    fn display_uses_bare_name() {
        assert_eq!(NodeKind::named("chat").to_string(), "chat");
        assert_eq!(NodeKind::Start.to_string(), "Start");
    }
}
