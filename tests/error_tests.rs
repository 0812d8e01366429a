//! End-to-end checks of error merging and rendering through real parses.

use parsell::{empty, fail, optional, token_primitive, tokens, unexpected, Parser};

type CharParser<R> = Parser<&'static str, (), R>;

fn char_p(expected: char) -> CharParser<char> {
    token_primitive(
        |c: &char| format!("{c:?}"),
        |pos, c| pos.advance_char(*c),
        move |c: &char| if *c == expected { Some(*c) } else { None },
    )
    .label(&format!("{expected:?}"))
}

fn string_p(expected: &str) -> CharParser<Vec<char>> {
    tokens(
        |items: &[char]| format!("{:?}", items.iter().collect::<String>()),
        |pos, items| pos.advance_string(&items.iter().collect::<String>()),
        expected.chars().collect(),
    )
}

#[test]
fn unknown_error_renders_as_unknown() {
    let p: CharParser<char> = empty();
    let err = p.parse("test", "abc").unwrap_err();
    assert_eq!(err.to_string(), "test:1:1:\nunknown parse error");
}

#[test]
fn alternatives_pool_expectations_at_same_position() {
    let p = string_p("ab").attempt() | string_p("ax").attempt();
    let err = p.parse("test", "ay").unwrap_err();
    assert_eq!(err.position().column(), 2);
    assert_eq!(
        err.to_string(),
        "test:1:2:\nunexpected \"y\"\nexpecting \"ab\" or \"ax\""
    );
}

#[test]
fn furthest_failure_wins_across_alternatives() {
    let p = (char_p('a') * char_p('b')).attempt() | char_p('x');
    let err = p.parse("test", "ac").unwrap_err();
    assert_eq!(err.position().column(), 2);
    assert_eq!(err.to_string(), "test:1:2:\nunexpected 'c'\nexpecting 'b'");
}

#[test]
fn residual_expectations_survive_sequencing() {
    // optional(a) succeeds empty but remembers it could have taken 'a';
    // when 'b' then fails at the same spot, both show up.
    let p = optional(char_p('a')) * char_p('b');
    let err = p.parse("test", "c").unwrap_err();
    assert_eq!(err.to_string(), "test:1:1:\nunexpected 'c'\nexpecting 'a' or 'b'");
}

#[test]
fn generic_messages_render_without_prefix() {
    let p = char_p('a') | fail("gave up");
    let err = p.parse("test", "z").unwrap_err();
    assert_eq!(
        err.to_string(),
        "test:1:1:\nunexpected 'z'\nexpecting 'a'\ngave up"
    );
}

#[test]
fn user_unexpected_suppresses_system_message() {
    let p = char_p('a') | unexpected("stray token");
    let err = p.parse("test", "z").unwrap_err();
    assert_eq!(
        err.to_string(),
        "test:1:1:\nunexpected stray token\nexpecting 'a'"
    );
}

#[test]
fn label_does_not_rewrite_after_consumption() {
    let p = (char_p('a') * char_p('b')).label("pair");
    let err = p.parse("test", "ax").unwrap_err();
    assert_eq!(err.to_string(), "test:1:2:\nunexpected 'x'\nexpecting 'b'");
}

#[test]
fn label_replaces_expectations_of_empty_failure() {
    let p = (char_p('a') * char_p('b')).label("pair");
    let err = p.parse("test", "x").unwrap_err();
    assert_eq!(err.to_string(), "test:1:1:\nunexpected 'x'\nexpecting pair");
}

#[test]
fn error_position_lands_on_the_failing_line() {
    let p = string_p("a\nb") * char_p('c');
    let err = p.parse("test", "a\nbz").unwrap_err();
    assert_eq!((err.position().line(), err.position().column()), (2, 2));
}
