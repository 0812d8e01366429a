use std::process;

use parsell::{lazy, many, many1, token_primitive, Parser};

type CharParser<R> = Parser<&'static str, (), R>;

/// Match one specific character.
fn char_p(expected: char) -> CharParser<char> {
    token_primitive(
        |c: &char| format!("{c:?}"),
        |pos, c| pos.advance_char(*c),
        move |c: &char| if *c == expected { Some(*c) } else { None },
    )
    .label(&format!("{expected:?}"))
}

/// digit := '0'..'9'
fn digit() -> CharParser<char> {
    token_primitive(
        |c: &char| format!("{c:?}"),
        |pos, c| pos.advance_char(*c),
        |c: &char| if c.is_ascii_digit() { Some(*c) } else { None },
    )
    .label("digit")
}

/// number := digit+
fn number() -> CharParser<i64> {
    many1(digit())
        >> |digits| {
            // digit runs that overflow i64 saturate
            digits
                .into_iter()
                .collect::<String>()
                .parse()
                .unwrap_or(i64::MAX)
        }
}

/// factor := number | "(" expr ")"
fn factor() -> CharParser<i64> {
    number() | (char_p('(') * lazy(expr) - char_p(')'))
}

/// term := factor ("*" factor)*
fn term() -> CharParser<i64> {
    (factor() + many(char_p('*') * factor()))
        >> |(first, rest)| rest.into_iter().fold(first, |product, n| product * n)
}

/// expr := term ("+" term)*
fn expr() -> CharParser<i64> {
    (term() + many(char_p('+') * term()))
        >> |(first, rest)| rest.into_iter().fold(first, |sum, n| sum + n)
}

const INPUT: &str = "2+3*(4+5)";

fn main() -> anyhow::Result<()> {
    let value = match expr().parse("<demo>", INPUT) {
        Ok(value) => value,
        Err(e) => {
            println!("{e}");
            process::exit(-1);
        }
    };

    println!("{INPUT} = {value}");

    Ok(())
}
