//! # Token Primitives
//!
//! The two parsers that actually read the stream, plus the user-state
//! accessors. Every other combinator in the crate is stream-agnostic and
//! composes these.
//!
//! Position tracking is the caller's contract: both primitives take an
//! `advance` function describing how a token moves the source position,
//! and a `describe` function rendering a token for error messages. For
//! character streams, `SourcePos::advance_char` and `advance_string` are
//! the usual advance functions.

use crate::error::{Message, ParseError};
use crate::parser::Parser;
use crate::pos::SourcePos;
use crate::reply::{Consumed, Reply};
use crate::state::ParseState;
use crate::stream::Stream;

/// Consume one token accepted by `matcher`.
///
/// The predicate returns the parsed value, so matching and conversion
/// happen in one step. On a match the parser consumes and the position
/// advances; on a mismatch (or end of input) it fails empty with an
/// auto-generated unexpected-token message at the current position.
pub fn token_primitive<S, U, R, D, A, M>(describe: D, advance: A, matcher: M) -> Parser<S, U, R>
where
    S: Stream + 'static,
    U: 'static,
    R: 'static,
    D: Fn(&S::Item) -> String + 'static,
    A: Fn(&SourcePos, &S::Item) -> SourcePos + 'static,
    M: Fn(&S::Item) -> Option<R> + 'static,
{
    Parser::new(move |mut state: ParseState<S, U>| match state.input.pop_first() {
        None => Consumed::Empty(Reply::Err(ParseError::new(
            state.pos,
            Message::SysUnexpected(String::new()),
        ))),
        Some(item) => match matcher(&item) {
            Some(value) => {
                state.pos = advance(&state.pos, &item);
                let residual = ParseError::unknown(state.pos.clone());
                Consumed::Consumed(Reply::Ok(value, state, residual))
            }
            None => Consumed::Empty(Reply::Err(ParseError::new(
                state.pos,
                Message::SysUnexpected(describe(&item)),
            ))),
        },
    })
}

/// Match a literal token sequence, yielding the whole sequence.
///
/// Consumption starts with the first matched token, so a mismatch at the
/// head fails empty (the choice point stays open) while a mismatch
/// further in is committed. Errors point at the first token that could
/// not be matched and expect the full sequence as rendered by `describe`.
pub fn tokens<S, U, D, A>(
    describe: D,
    advance: A,
    expected: Vec<S::Item>,
) -> Parser<S, U, Vec<S::Item>>
where
    S: Stream + 'static,
    S::Item: PartialEq + Clone + 'static,
    U: 'static,
    D: Fn(&[S::Item]) -> String + 'static,
    A: Fn(&SourcePos, &[S::Item]) -> SourcePos + 'static,
{
    Parser::new(move |mut state: ParseState<S, U>| {
        if expected.is_empty() {
            let residual = ParseError::unknown(state.pos.clone());
            return Consumed::Empty(Reply::Ok(Vec::new(), state, residual));
        }

        let start = state.pos.clone();
        let mut matched = 0;
        while matched < expected.len() {
            let failure = match state.input.pop_first() {
                None => Some(Message::SysUnexpected(String::new())),
                Some(item) if item == expected[matched] => None,
                Some(item) => {
                    Some(Message::SysUnexpected(describe(std::slice::from_ref(&item))))
                }
            };
            if let Some(message) = failure {
                let error = ParseError::new(advance(&start, &expected[..matched]), message)
                    .insert(Message::Expected(describe(&expected)));
                let reply = Reply::Err(error);
                return if matched > 0 {
                    Consumed::Consumed(reply)
                } else {
                    Consumed::Empty(reply)
                };
            }
            matched += 1;
        }

        state.pos = advance(&start, &expected);
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Consumed(Reply::Ok(expected.clone(), state, residual))
    })
}

// === User-state and state-inspection parsers ===

/// Apply `f` to the user state. Succeeds empty with unit.
pub fn update_user_state<S, U, F>(f: F) -> Parser<S, U, ()>
where
    S: 'static,
    U: 'static,
    F: Fn(&mut U) + 'static,
{
    Parser::new(move |mut state: ParseState<S, U>| {
        f(&mut state.user_state);
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Empty(Reply::Ok((), state, residual))
    })
}

/// Yield the current user state.
pub fn get_user_state<S, U>() -> Parser<S, U, U>
where
    S: 'static,
    U: Clone + 'static,
{
    Parser::new(|state: ParseState<S, U>| {
        let value = state.user_state.clone();
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Empty(Reply::Ok(value, state, residual))
    })
}

/// Replace the user state.
pub fn set_user_state<S, U>(user_state: U) -> Parser<S, U, ()>
where
    S: 'static,
    U: Clone + 'static,
{
    Parser::new(move |mut state: ParseState<S, U>| {
        state.user_state = user_state.clone();
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Empty(Reply::Ok((), state, residual))
    })
}

/// Yield the current source position.
pub fn get_position<S, U>() -> Parser<S, U, SourcePos>
where
    S: 'static,
    U: 'static,
{
    Parser::new(|state: ParseState<S, U>| {
        let pos = state.pos.clone();
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Empty(Reply::Ok(pos, state, residual))
    })
}
