use std::ops::{Add, BitOr, Mul, Shr, Sub};
use std::rc::Rc;

use crate::error::ParseError;
use crate::pos::SourcePos;
use crate::reply::{merge_error_reply, Consumed, Reply};
use crate::state::ParseState;

type Transition<S, U, R> = dyn Fn(ParseState<S, U>) -> Consumed<Reply<S, U, R>>;

// === Parser value ===

/// A parser over streams `S` with user state `U`, producing `R`.
///
/// A parser is a value holding a transition function from a parse state to
/// a tagged reply. Combinators compose transition functions; nothing runs
/// until `run` (or `parse`) is called.
pub struct Parser<S, U, R> {
    transition: Rc<Transition<S, U, R>>,
}

impl<S, U, R> Clone for Parser<S, U, R> {
    fn clone(&self) -> Self {
        Parser {
            transition: Rc::clone(&self.transition),
        }
    }
}

impl<S: 'static, U: 'static, R: 'static> Parser<S, U, R> {
    pub fn new<F>(transition: F) -> Self
    where
        F: Fn(ParseState<S, U>) -> Consumed<Reply<S, U, R>> + 'static,
    {
        Parser {
            transition: Rc::new(transition),
        }
    }

    /// Apply the transition function directly, exposing the consumption
    /// tag. Combinators and tests use this; everything else wants `run`.
    pub fn run_state(&self, state: ParseState<S, U>) -> Consumed<Reply<S, U, R>> {
        (self.transition)(state)
    }

    /// Run against `input` from line 1, column 1 of `source_name`.
    /// Returns the result and the final user state, or the parse error.
    pub fn run(&self, user_state: U, source_name: &str, input: S) -> Result<(R, U), ParseError> {
        let state = ParseState::new(input, SourcePos::new(source_name), user_state);
        match self.run_state(state).into_inner() {
            Reply::Ok(value, state, _) => Ok((value, state.user_state)),
            Reply::Err(error) => Err(error),
        }
    }
}

impl<S: 'static, R: 'static> Parser<S, (), R> {
    /// `run` for parsers that carry no user state.
    pub fn parse(&self, source_name: &str, input: S) -> Result<R, ParseError> {
        self.run((), source_name, input).map(|(value, ())| value)
    }
}

// === Combinators as methods ===

impl<S: 'static, U: 'static, R: 'static> Parser<S, U, R> {
    /// Map: transform the result
    pub fn map<T: 'static, F: Fn(R) -> T + 'static>(self, f: F) -> Parser<S, U, T> {
        Parser::new(move |state| match self.run_state(state) {
            Consumed::Consumed(reply) => Consumed::Consumed(reply.map(&f)),
            Consumed::Empty(reply) => Consumed::Empty(reply.map(&f)),
        })
    }

    /// Monadic sequencing: feed the result into `k` and continue with the
    /// parser it returns.
    ///
    /// The consumption tags combine as expected: the composite has
    /// consumed if either part did. When the continuation does not
    /// consume, its error is merged with the first part's residual, so
    /// expectations from both sides survive into the report.
    pub fn bind<T: 'static, K>(self, k: K) -> Parser<S, U, T>
    where
        K: Fn(R) -> Parser<S, U, T> + 'static,
    {
        Parser::new(move |state| match self.run_state(state) {
            Consumed::Consumed(reply) => Consumed::Consumed(match reply {
                Reply::Ok(value, next, residual) => match k(value).run_state(next) {
                    Consumed::Consumed(reply2) => reply2,
                    Consumed::Empty(reply2) => merge_error_reply(residual, reply2),
                },
                Reply::Err(error) => Reply::Err(error),
            }),
            Consumed::Empty(reply) => match reply {
                Reply::Ok(value, next, residual) => match k(value).run_state(next) {
                    Consumed::Consumed(reply2) => Consumed::Consumed(reply2),
                    Consumed::Empty(reply2) => {
                        Consumed::Empty(merge_error_reply(residual, reply2))
                    }
                },
                Reply::Err(error) => Consumed::Empty(Reply::Err(error)),
            },
        })
    }

    /// Sequence: parse self then other, return (R, T)
    pub fn seq<T: 'static>(self, other: Parser<S, U, T>) -> Parser<S, U, (R, T)>
    where
        R: Clone,
    {
        self.bind(move |first| other.clone().map(move |second| (first.clone(), second)))
    }

    /// Keep left: parse self then other, discard other's result
    pub fn skip<T: 'static>(self, other: Parser<S, U, T>) -> Parser<S, U, R>
    where
        R: Clone,
    {
        self.bind(move |first| other.clone().map(move |_| first.clone()))
    }

    /// Keep right: parse self then other, discard self's result
    pub fn skip_left<T: 'static>(self, other: Parser<S, U, T>) -> Parser<S, U, T> {
        self.bind(move |_| other.clone())
    }

    /// Predictive choice: try `other` only if self failed without
    /// consuming. A failure after consumption is committed and propagates;
    /// wrap self in `attempt` to opt out.
    pub fn or(self, other: Parser<S, U, R>) -> Parser<S, U, R>
    where
        S: Clone,
        U: Clone,
    {
        Parser::new(move |state: ParseState<S, U>| {
            let saved = state.clone();
            match self.run_state(state) {
                Consumed::Empty(Reply::Err(error)) => match other.run_state(saved) {
                    Consumed::Empty(reply) => Consumed::Empty(merge_error_reply(error, reply)),
                    consumed => consumed,
                },
                outcome => outcome,
            }
        })
    }

    /// Pretend nothing was consumed on failure, making the parser safe as
    /// the left arm of `or` even when it fails halfway through.
    pub fn attempt(self) -> Parser<S, U, R> {
        Parser::new(move |state| match self.run_state(state) {
            Consumed::Consumed(Reply::Err(error)) => Consumed::Empty(Reply::Err(error)),
            outcome => outcome,
        })
    }

    /// Parse without moving: on success the original state is re-emitted
    /// with an unknown residual. Failures behave exactly as without
    /// `look_ahead`, consumption included.
    pub fn look_ahead(self) -> Parser<S, U, R>
    where
        S: Clone,
        U: Clone,
    {
        Parser::new(move |state: ParseState<S, U>| {
            let saved = state.clone();
            match self.run_state(state) {
                Consumed::Consumed(Reply::Ok(value, _, _))
                | Consumed::Empty(Reply::Ok(value, _, _)) => {
                    let residual = ParseError::unknown(saved.pos.clone());
                    Consumed::Empty(Reply::Ok(value, saved, residual))
                }
                failure => failure,
            }
        })
    }

    /// Name what this parser expects. Rewrites the `Expected` messages of
    /// an `Empty` outcome; a committed failure keeps its own story, since
    /// the label would hide where the input actually went wrong.
    pub fn labels(self, names: &[&str]) -> Parser<S, U, R> {
        let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        Parser::new(move |state| match self.run_state(state) {
            Consumed::Empty(Reply::Err(error)) => {
                Consumed::Empty(Reply::Err(error.set_expected(&names)))
            }
            Consumed::Empty(Reply::Ok(value, next, residual)) => {
                let residual = if residual.is_unknown() {
                    residual
                } else {
                    residual.set_expected(&names)
                };
                Consumed::Empty(Reply::Ok(value, next, residual))
            }
            consumed => consumed,
        })
    }

    /// `labels` with a single name.
    pub fn label(self, name: &str) -> Parser<S, U, R> {
        self.labels(&[name])
    }
}

// === Operator Overloading ===

/// `+` for sequence: A + B -> (A, B)
impl<S: 'static, U: 'static, R: Clone + 'static, T: 'static> Add<Parser<S, U, T>>
    for Parser<S, U, R>
{
    type Output = Parser<S, U, (R, T)>;

    fn add(self, rhs: Parser<S, U, T>) -> Self::Output {
        self.seq(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<S: 'static, U: 'static, R: Clone + 'static, T: 'static> Sub<Parser<S, U, T>>
    for Parser<S, U, R>
{
    type Output = Parser<S, U, R>;

    fn sub(self, rhs: Parser<S, U, T>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<S: 'static, U: 'static, R: 'static, T: 'static> Mul<Parser<S, U, T>> for Parser<S, U, R> {
    type Output = Parser<S, U, T>;

    fn mul(self, rhs: Parser<S, U, T>) -> Self::Output {
        self.skip_left(rhs)
    }
}

/// `|` for choice: A | B -> A or B
impl<S: Clone + 'static, U: Clone + 'static, R: 'static> BitOr<Parser<S, U, R>>
    for Parser<S, U, R>
{
    type Output = Parser<S, U, R>;

    fn bitor(self, rhs: Parser<S, U, R>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<S: 'static, U: 'static, R: 'static, T: 'static, F: Fn(R) -> T + 'static> Shr<F>
    for Parser<S, U, R>
{
    type Output = Parser<S, U, T>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}
