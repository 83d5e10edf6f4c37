//! Input classification: the single binary decision of the dispatch graph.
//!
//! Routing is literal character membership over the raw input: if any of
//! `+ - * / =` appears anywhere in the string, the input is labelled
//! [`RouteLabel::Math`], otherwise [`RouteLabel::Chat`]. No tokenizing, no
//! intent detection. This deliberately reproduces the system's known
//! imprecision: chat text containing a stray hyphen or equals sign (say
//! "what's 2-2 cats?") is routed to the math handler. Changing that rule
//! would silently change observable behavior, so it stays.

use std::sync::Arc;

use crate::graphs::EdgePredicate;

/// Characters whose presence routes an input to the math handler.
pub const ROUTE_OPERATORS: [char; 5] = ['+', '-', '*', '/', '='];

/// The two dispatch targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteLabel {
    /// Arithmetic input, handled by the math node.
    Math,
    /// Everything else, handled by the chat node.
    Chat,
}

impl RouteLabel {
    /// Classify a raw input string.
    ///
    /// Total over all strings: any input is accepted, including the empty
    /// string (which routes to chat). Pure, no side effects.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mathchat::router::RouteLabel;
    ///
    /// assert_eq!(RouteLabel::of("4 + 5 * 2"), RouteLabel::Math);
    /// assert_eq!(RouteLabel::of("hello there"), RouteLabel::Chat);
    /// assert_eq!(RouteLabel::of(""), RouteLabel::Chat);
    /// // Preserved imprecision: membership, not parsing.
    /// assert_eq!(RouteLabel::of("what's 2-2 cats?"), RouteLabel::Math);
    /// ```
    #[must_use]
    pub fn of(input: &str) -> Self {
        if input.chars().any(|c| ROUTE_OPERATORS.contains(&c)) {
            RouteLabel::Math
        } else {
            RouteLabel::Chat
        }
    }

    /// The graph node name this label routes to.
    #[must_use]
    pub fn as_target(&self) -> String {
        match self {
            RouteLabel::Math => "math".to_string(),
            RouteLabel::Chat => "chat".to_string(),
        }
    }
}

impl std::fmt::Display for RouteLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteLabel::Math => write!(f, "math"),
            RouteLabel::Chat => write!(f, "chat"),
        }
    }
}

/// The routing decision as a conditional-edge predicate.
///
/// Attached to the router node's outgoing conditional edge; returns the
/// single target node name for the classified input.
#[must_use]
pub fn routing_predicate() -> EdgePredicate {
    Arc::new(|snapshot| vec![RouteLabel::of(&snapshot.input).as_target()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_route_to_math() {
        for op in ROUTE_OPERATORS {
            let input = format!("a{op}b");
            assert_eq!(RouteLabel::of(&input), RouteLabel::Math, "op {op}");
        }
    }

    #[test]
    fn plain_text_routes_to_chat() {
        assert_eq!(RouteLabel::of("tell me a story"), RouteLabel::Chat);
        assert_eq!(RouteLabel::of(""), RouteLabel::Chat);
    }

    #[test]
    fn labels_name_their_nodes() {
        assert_eq!(RouteLabel::Math.as_target(), "math");
        assert_eq!(RouteLabel::Chat.as_target(), "chat");
        assert_eq!(RouteLabel::Math.to_string(), "math");
    }
}
