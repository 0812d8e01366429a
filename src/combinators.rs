//! Constructors and derived combinators.
//!
//! Everything here is defined in terms of `bind`, `or`, and the raw
//! four-way algebra; none of these functions touch the input stream.

use std::rc::Rc;

use crate::error::{Message, ParseError};
use crate::parser::Parser;
use crate::reply::{Consumed, Reply};
use crate::state::ParseState;
use crate::stream::Accumulate;

// === Constructors ===

/// Succeed with `value` without consuming anything.
pub fn pure<S: 'static, U: 'static, R: Clone + 'static>(value: R) -> Parser<S, U, R> {
    Parser::new(move |state: ParseState<S, U>| {
        let residual = ParseError::unknown(state.pos.clone());
        Consumed::Empty(Reply::Ok(value.clone(), state, residual))
    })
}

/// Fail without consuming, with an unknown error. The identity of `or`.
pub fn empty<S: 'static, U: 'static, R: 'static>() -> Parser<S, U, R> {
    Parser::new(|state: ParseState<S, U>| {
        Consumed::Empty(Reply::Err(ParseError::unknown(state.pos)))
    })
}

/// Fail without consuming, with a free-form message.
pub fn fail<S: 'static, U: 'static, R: 'static>(message: impl Into<String>) -> Parser<S, U, R> {
    let message = message.into();
    Parser::new(move |state: ParseState<S, U>| {
        Consumed::Empty(Reply::Err(ParseError::new(
            state.pos,
            Message::Generic(message.clone()),
        )))
    })
}

/// Fail without consuming, reporting `message` as the unexpected item.
pub fn unexpected<S: 'static, U: 'static, R: 'static>(
    message: impl Into<String>,
) -> Parser<S, U, R> {
    let message = message.into();
    Parser::new(move |state: ParseState<S, U>| {
        Consumed::Empty(Reply::Err(ParseError::new(
            state.pos,
            Message::Unexpected(message.clone()),
        )))
    })
}

/// Defer construction: `thunk` is invoked when the parser runs, so
/// recursive grammars can refer to themselves.
pub fn lazy<S: 'static, U: 'static, R: 'static, F>(thunk: F) -> Parser<S, U, R>
where
    F: Fn() -> Parser<S, U, R> + 'static,
{
    Parser::new(move |state| thunk().run_state(state))
}

// === Repetition ===

/// Run `parser` until it fails without consuming, folding the results
/// into any accumulator.
///
/// Iterations must consume: a parser that succeeds on empty input would
/// loop forever, so that is reported as a programmer error.
pub fn many_accumulator<S, U, R, A>(parser: Parser<S, U, R>) -> Parser<S, U, A>
where
    S: Clone + 'static,
    U: Clone + 'static,
    R: 'static,
    A: Accumulate<R> + 'static,
{
    Parser::new(move |state: ParseState<S, U>| {
        let mut accumulated = A::empty();
        let mut current = state;
        let mut consumed_any = false;
        loop {
            match parser.run_state(current.clone()) {
                Consumed::Consumed(Reply::Ok(value, next, _)) => {
                    accumulated = accumulated.accumulate(value);
                    current = next;
                    consumed_any = true;
                }
                Consumed::Consumed(Reply::Err(error)) => {
                    return Consumed::Consumed(Reply::Err(error));
                }
                Consumed::Empty(Reply::Ok(..)) => {
                    panic!(
                        "combinator 'many' is applied to a parser that accepts an empty input"
                    );
                }
                Consumed::Empty(Reply::Err(error)) => {
                    let reply = Reply::Ok(accumulated, current, error);
                    return if consumed_any {
                        Consumed::Consumed(reply)
                    } else {
                        Consumed::Empty(reply)
                    };
                }
            }
        }
    })
}

/// Parse zero or more occurrences
pub fn many<S, U, R>(parser: Parser<S, U, R>) -> Parser<S, U, Vec<R>>
where
    S: Clone + 'static,
    U: Clone + 'static,
    R: 'static,
{
    many_accumulator(parser)
}

/// Parse one or more occurrences
pub fn many1<S, U, R>(parser: Parser<S, U, R>) -> Parser<S, U, Vec<R>>
where
    S: Clone + 'static,
    U: Clone + 'static,
    R: Clone + 'static,
{
    let rest = parser.clone();
    parser.bind(move |first| {
        many(rest.clone()).map(move |tail| {
            let mut items = vec![first.clone()];
            items.extend(tail);
            items
        })
    })
}

/// Parse zero or more occurrences, discarding the results
pub fn skip_many<S, U, R>(parser: Parser<S, U, R>) -> Parser<S, U, ()>
where
    S: Clone + 'static,
    U: Clone + 'static,
    R: 'static,
{
    many_accumulator::<S, U, R, ()>(parser)
}

/// Optional: parse zero or one
pub fn optional<S, U, R>(parser: Parser<S, U, R>) -> Parser<S, U, Option<R>>
where
    S: Clone + 'static,
    U: Clone + 'static,
    R: Clone + 'static,
{
    parser.map(Some).or(pure(None))
}

// === Lifting functions over parsers ===

/// Run a parsed function over a parsed argument.
pub fn apply<S, U, A, B, F>(func: Parser<S, U, F>, arg: Parser<S, U, A>) -> Parser<S, U, B>
where
    S: 'static,
    U: 'static,
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + 'static,
{
    func.bind(move |f| arg.clone().map(f))
}

/// Apply `f` to two results, left to right.
pub fn lift2<S, U, A, B, C, F>(
    f: F,
    pa: Parser<S, U, A>,
    pb: Parser<S, U, B>,
) -> Parser<S, U, C>
where
    S: 'static,
    U: 'static,
    A: Clone + 'static,
    B: 'static,
    C: 'static,
    F: Fn(A, B) -> C + 'static,
{
    let f = Rc::new(f);
    pa.bind(move |a| {
        let f = Rc::clone(&f);
        pb.clone().map(move |b| f(a.clone(), b))
    })
}

/// Apply `f` to three results, left to right.
pub fn lift3<S, U, A, B, C, D, F>(
    f: F,
    pa: Parser<S, U, A>,
    pb: Parser<S, U, B>,
    pc: Parser<S, U, C>,
) -> Parser<S, U, D>
where
    S: 'static,
    U: 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
    D: 'static,
    F: Fn(A, B, C) -> D + 'static,
{
    lift2(move |(a, b), c| f(a, b, c), pa.seq(pb), pc)
}

/// Apply `f` to four results, left to right.
pub fn lift4<S, U, A, B, C, D, E, F>(
    f: F,
    pa: Parser<S, U, A>,
    pb: Parser<S, U, B>,
    pc: Parser<S, U, C>,
    pd: Parser<S, U, D>,
) -> Parser<S, U, E>
where
    S: 'static,
    U: 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: 'static,
    E: 'static,
    F: Fn(A, B, C, D) -> E + 'static,
{
    lift2(move |((a, b), c), d| f(a, b, c, d), pa.seq(pb).seq(pc), pd)
}

/// Apply `f` to five results, left to right.
pub fn lift5<S, U, A, B, C, D, E, G, F>(
    f: F,
    pa: Parser<S, U, A>,
    pb: Parser<S, U, B>,
    pc: Parser<S, U, C>,
    pd: Parser<S, U, D>,
    pe: Parser<S, U, E>,
) -> Parser<S, U, G>
where
    S: 'static,
    U: 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
    E: 'static,
    G: 'static,
    F: Fn(A, B, C, D, E) -> G + 'static,
{
    lift2(
        move |(((a, b), c), d), e| f(a, b, c, d, e),
        pa.seq(pb).seq(pc).seq(pd),
        pe,
    )
}
