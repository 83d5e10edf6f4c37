//! Edge types and routing predicates for conditional graph flow.

use crate::types::NodeKind;
use std::sync::Arc;

/// Predicate function for conditional edge routing.
///
/// Takes a [`StateSnapshot`](crate::state::StateSnapshot) and returns the
/// names of the nodes to execute next. `"End"` and `"Start"` are recognized
/// as the virtual endpoints; any other string names a custom node.
///
/// # Examples
///
/// ```
/// use mathchat::graphs::EdgePredicate;
/// use std::sync::Arc;
///
/// // Route on the presence of a question mark.
/// let route: EdgePredicate = Arc::new(|snapshot| {
///     if snapshot.input.contains('?') {
///         vec!["question".to_string()]
///     } else {
///         vec!["statement".to_string()]
///     }
/// });
/// ```
pub type EdgePredicate =
    Arc<dyn Fn(crate::state::StateSnapshot) -> Vec<String> + Send + Sync + 'static>;

/// A conditional edge that routes based on a predicate function.
///
/// When the scheduler finishes executing the edge's source node, it
/// evaluates the predicate against the current state snapshot and pushes
/// the returned targets onto the next frontier. Unknown custom targets are
/// skipped with a warning at runtime, preserving progress.
#[derive(Clone)]
pub struct ConditionalEdge {
    from: NodeKind,
    predicate: EdgePredicate,
}

impl ConditionalEdge {
    /// Create a new conditional edge.
    pub fn new(from: impl Into<NodeKind>, predicate: EdgePredicate) -> Self {
        Self {
            from: from.into(),
            predicate,
        }
    }

    /// The source node of this conditional edge.
    pub fn from(&self) -> &NodeKind {
        &self.from
    }

    /// The predicate function of this conditional edge.
    pub fn predicate(&self) -> &EdgePredicate {
        &self.predicate
    }
}
