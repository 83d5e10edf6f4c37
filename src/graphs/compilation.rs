//! Graph compilation and structural validation.

use miette::Diagnostic;
use thiserror::Error;

use crate::app::App;
use crate::types::NodeKind;

/// Structural problems detected at compile time.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphCompileError {
    /// No edge originates from `Start`, so execution could never begin.
    #[error("graph has no entry: no edge originates from Start")]
    #[diagnostic(
        code(mathchat::graphs::missing_entry),
        help("Add an edge from NodeKind::Start to your entry node.")
    )]
    MissingEntry,

    /// A static edge references a custom node that was never registered.
    #[error("edge {from} -> {to} references unregistered node `{to}`")]
    #[diagnostic(
        code(mathchat::graphs::dangling_edge),
        help("Register the node with add_node before wiring edges to it.")
    )]
    DanglingEdge { from: NodeKind, to: NodeKind },
}

impl super::builder::GraphBuilder {
    /// Compile the graph into an executable [`App`].
    ///
    /// Validates that an entry exists (some edge from `Start`) and that
    /// every static edge points at a registered node or a virtual
    /// endpoint. Conditional-edge targets are produced at runtime and are
    /// validated there instead (unknown targets are skipped with a
    /// warning).
    ///
    /// # Errors
    ///
    /// [`GraphCompileError::MissingEntry`] when nothing leaves `Start`;
    /// [`GraphCompileError::DanglingEdge`] for edges to unknown nodes.
    pub fn compile(self) -> Result<App, GraphCompileError> {
        if self.edges.get(&NodeKind::Start).is_none_or(|e| e.is_empty()) {
            return Err(GraphCompileError::MissingEntry);
        }

        for (from, targets) in &self.edges {
            for to in targets {
                if to.is_custom() && !self.nodes.contains_key(to) {
                    return Err(GraphCompileError::DanglingEdge {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }

        Ok(App::from_parts(
            self.nodes,
            self.edges,
            self.conditional_edges,
        ))
    }
}
