//! Lexical building blocks shared by the expression grammar and the
//! variables reader.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{cut, map, map_opt, map_res, opt, recognize},
    error::{context, VerboseError},
    sequence::{delimited, pair, preceded},
    IResult,
};
use tint_core::{Color, LengthUnit, ParseError};

pub type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Parse an identifier (starts with letter/underscore, followed by alphanumeric/underscore/hyphen).
pub fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    ))(input)
}

/// Parse an unsigned number: `12`, `1.25` or `.25`.
pub fn number(input: &str) -> PResult<'_, f64> {
    map_res(
        recognize(alt((
            recognize(pair(digit1, opt(pair(char('.'), digit1)))),
            recognize(pair(char('.'), digit1)),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Parse a unit suffix.
pub fn unit(input: &str) -> PResult<'_, LengthUnit> {
    alt((
        map(char('%'), |_| LengthUnit::Percent),
        map_opt(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            LengthUnit::from_suffix,
        ),
    ))(input)
}

/// Parse a hex color. Once `#` is seen the digits must form a valid color.
pub fn hex_color(input: &str) -> PResult<'_, Color> {
    preceded(
        char('#'),
        cut(context(
            "expected a 3, 4, 6 or 8 digit hex color",
            map_opt(take_while1(|c: char| c.is_ascii_hexdigit()), Color::from_hex),
        )),
    )(input)
}

/// Parse a quoted string, optionally escaped with `~`. Returns the contents.
pub fn quoted(input: &str) -> PResult<'_, &str> {
    preceded(
        opt(char('~')),
        alt((
            delimited(char('"'), take_while(|c: char| c != '"'), cut(char('"'))),
            delimited(char('\''), take_while(|c: char| c != '\''), cut(char('\''))),
        )),
    )(input)
}

/// Parse a token reference `@name`, returning the name.
pub fn reference(input: &str) -> PResult<'_, &str> {
    preceded(char('@'), cut(context("expected a token name after `@`", identifier)))(input)
}

/// A line of input with its position in the source.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub content: &'a str,
    pub line_number: usize,
    /// Byte offset of `content` in the comment-stripped source
    pub offset: usize,
    /// 1-based column of the first non-blank character
    pub column: usize,
}

/// Replace `//` and `/* */` comments with spaces, keeping newlines so line
/// numbers survive. Comment markers inside quoted strings are left alone.
pub fn strip_comments(source: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut line = 1u32;
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
            // Strings do not span lines.
            quote = None;
            out.push(c);
            continue;
        }

        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            out.push(c);
            continue;
        }

        match (c, chars.peek()) {
            ('"' | '\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                out.push(' ');
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(' ');
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                let start_line = line;
                chars.next();
                out.push_str("  ");
                let mut closed = false;
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        out.push_str("  ");
                        closed = true;
                        break;
                    }
                    if next == '\n' {
                        line += 1;
                        out.push('\n');
                    } else {
                        out.push(' ');
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedComment { line: start_line });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Split input into non-blank lines.
pub fn split_lines(input: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    let mut lines = Vec::new();

    for (i, raw) in input.split('\n').enumerate() {
        let indent = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            lines.push(Line {
                content: trimmed,
                line_number: i + 1,
                offset: offset + indent,
                column: raw[..indent].chars().count() + 1,
            });
        }
        offset += raw.len() + 1;
    }

    lines
}
