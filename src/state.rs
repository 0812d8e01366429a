//! # Parser State
//!
//! The state threaded through every parse: the remaining input, the
//! current source position, and the caller's user state.
//!
//! States are plain values. A combinator that wants to try something and
//! fall back (`or`, `look_ahead`, the `many` loop) clones the state and
//! hands the clone to the speculative branch; the original is untouched.
//! There is no save/restore protocol and no shared mutability, which is
//! what makes the consumption flag on replies trustworthy: a parser that
//! reports `Empty` really has left the state alone.

use crate::pos::SourcePos;

/// `(input, position, user_state)`, by value.
#[derive(Debug, Clone)]
pub struct ParseState<S, U> {
    /// Remaining input cursor.
    pub input: S,

    /// Position of the next token to be consumed.
    pub pos: SourcePos,

    /// Caller-supplied state, threaded through the parse untouched except
    /// by the user-state parsers.
    pub user_state: U,
}

impl<S, U> ParseState<S, U> {
    pub fn new(input: S, pos: SourcePos, user_state: U) -> Self {
        Self {
            input,
            pos,
            user_state,
        }
    }
}
