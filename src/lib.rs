//! Parsell - a Parsec-style parser combinator library
//!
//! This library provides the core machinery for building predictive LL(1)
//! parsers over arbitrary token streams: the four-way consumption/reply
//! algebra, mergeable parse errors, and the primitive combinators
//! everything else is composed from.

pub mod combinators;
pub mod error;
pub mod parser;
pub mod pos;
pub mod primitives;
pub mod reply;
pub mod state;
pub mod stream;

pub use combinators::{
    apply, empty, fail, lazy, lift2, lift3, lift4, lift5, many, many1, many_accumulator,
    optional, pure, skip_many, unexpected,
};
pub use error::{Message, ParseError};
pub use parser::Parser;
pub use pos::SourcePos;
pub use primitives::{
    get_position, get_user_state, set_user_state, token_primitive, tokens, update_user_state,
};
pub use reply::{Consumed, Reply};
pub use state::ParseState;
pub use stream::{Accumulate, Stream};
