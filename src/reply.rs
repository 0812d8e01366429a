//! # The Four-Way Reply Algebra
//!
//! Every parser invocation produces one of four outcomes, the
//! cross-product of two independent axes:
//!
//! - **Consumed / Empty**: did the parser advance the input cursor?
//! - **Ok / Err**: did it produce a value?
//!
//! The consumption axis is what makes choice predictive: `or` only tries
//! its second branch after an `Empty` failure. Once a parser has consumed
//! input it is *committed* and its failure propagates, unless `attempt`
//! explicitly rewrites the outcome back to `Empty`.
//!
//! A successful reply also carries a *residual* error: what else could
//! have matched at that point. Residuals start out unknown and are merged
//! into whatever error a later combinator produces at the same position,
//! so the final report lists every alternative that was open.

use crate::error::ParseError;
use crate::state::ParseState;

/// Outcome of running a parser: a value and the new state, or a failure.
#[derive(Debug)]
pub enum Reply<S, U, R> {
    /// Success: result, state to continue from, and the residual error.
    Ok(R, ParseState<S, U>, ParseError),
    /// Failure.
    Err(ParseError),
}

impl<S, U, R> Reply<S, U, R> {
    /// Transform the success value; consumption and errors are untouched.
    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Reply<S, U, T> {
        match self {
            Reply::Ok(value, state, error) => Reply::Ok(f(value), state, error),
            Reply::Err(error) => Reply::Err(error),
        }
    }

    /// The error of either outcome: residual on success, the failure itself
    /// otherwise.
    pub fn error(&self) -> &ParseError {
        match self {
            Reply::Ok(_, _, error) => error,
            Reply::Err(error) => error,
        }
    }
}

/// A reply tagged with whether the parser advanced the input.
#[derive(Debug)]
pub enum Consumed<T> {
    Consumed(T),
    Empty(T),
}

impl<T> Consumed<T> {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Consumed::Consumed(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Consumed::Empty(_))
    }

    /// Drop the consumption tag. Only the run driver may do this: during
    /// composition the tag decides every combinator's behavior.
    pub fn into_inner(self) -> T {
        match self {
            Consumed::Consumed(inner) | Consumed::Empty(inner) => inner,
        }
    }
}

/// Fold an earlier residual error into a reply produced at the same point.
pub fn merge_error_reply<S, U, R>(
    error: ParseError,
    reply: Reply<S, U, R>,
) -> Reply<S, U, R> {
    match reply {
        Reply::Ok(value, state, residual) => Reply::Ok(value, state, error.merge(residual)),
        Reply::Err(failure) => Reply::Err(error.merge(failure)),
    }
}
