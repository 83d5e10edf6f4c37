//! Conversation state for a single dispatch invocation.
//!
//! The state is a small per-invocation record: the raw user `input` (set
//! once at graph entry, immutable afterwards), a write-once `output`
//! channel, and an `errors` channel collecting structured diagnostics.
//! There is no identity beyond one invocation and nothing is persisted.
//!
//! # Lifecycle
//!
//! 1. Created fresh with only `input` populated
//!    ([`ConversationState::new_with_input`]).
//! 2. Nodes receive an immutable [`StateSnapshot`] and return partial
//!    updates; the runtime applies them and bumps channel versions when
//!    content changed.
//! 3. Exactly one handler writes `output`; the state is discarded after
//!    the result is printed.
//!
//! # Examples
//!
//! ```rust
//! use mathchat::state::ConversationState;
//!
//! let state = ConversationState::new_with_input("4 + 5 * 2");
//! let snapshot = state.snapshot();
//! assert_eq!(snapshot.input, "4 + 5 * 2");
//! assert!(snapshot.output.is_none());
//! assert_eq!(snapshot.output_version, 1);
//! ```

use crate::channels::errors::ErrorEvent;
use crate::channels::{Channel, ErrorsChannel, OutputChannel};

/// The state record threaded through one dispatch invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationState {
    /// Raw user-supplied text, set once at graph entry.
    pub input: String,
    /// The handler's textual result; unset until a handler completes.
    pub output: OutputChannel,
    /// Structured error events accumulated during the invocation.
    pub errors: ErrorsChannel,
}

/// Immutable view of the state handed to nodes during execution.
///
/// Snapshots clone the channel payloads along with their versions, so a
/// node can never observe (or cause) a mid-step mutation.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    /// Raw user input at the time of the snapshot.
    pub input: String,
    /// Handler output, if one has already run.
    pub output: Option<String>,
    /// Version of the output channel when the snapshot was taken.
    pub output_version: u32,
    /// Error events at the time of the snapshot.
    pub errors: Vec<ErrorEvent>,
    /// Version of the errors channel when the snapshot was taken.
    pub errors_version: u32,
}

impl ConversationState {
    /// Create a fresh state for one invocation, carrying only the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mathchat::state::ConversationState;
    ///
    /// let state = ConversationState::new_with_input("hello there");
    /// assert_eq!(state.input, "hello there");
    /// assert!(!state.output.is_set());
    /// assert!(state.errors.is_empty());
    /// ```
    #[must_use]
    pub fn new_with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: OutputChannel::default(),
            errors: ErrorsChannel::default(),
        }
    }

    /// Builder for states with pre-populated channels (mostly for tests).
    #[must_use]
    pub fn builder() -> ConversationStateBuilder {
        ConversationStateBuilder::default()
    }

    /// Take an immutable snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            input: self.input.clone(),
            output: self.output.snapshot(),
            output_version: self.output.version(),
            errors: self.errors.snapshot(),
            errors_version: self.errors.version(),
        }
    }
}

/// Fluent constructor for [`ConversationState`].
///
/// # Examples
///
/// ```rust
/// use mathchat::state::ConversationState;
///
/// let state = ConversationState::builder()
///     .with_input("2 + 2")
///     .with_output("4")
///     .build();
/// let snapshot = state.snapshot();
/// assert_eq!(snapshot.output.as_deref(), Some("4"));
/// ```
#[derive(Debug, Default)]
pub struct ConversationStateBuilder {
    input: String,
    output: Option<String>,
    errors: Vec<ErrorEvent>,
}

impl ConversationStateBuilder {
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_error(mut self, event: ErrorEvent) -> Self {
        self.errors.push(event);
        self
    }

    #[must_use]
    pub fn build(self) -> ConversationState {
        ConversationState {
            input: self.input,
            output: OutputChannel::new(self.output, 1),
            errors: ErrorsChannel::new(self.errors, 1),
        }
    }
}
