//! Variables file reader.
//!
//! A theme is a list of `@name: expression;` declarations, one per line.
//! Comments are discarded; the expressions are kept as raw text and parsed
//! later by the resolver, so a malformed expression is reported against the
//! token that owns it.

use nom::{
    character::complete::{char, multispace0},
    error::VerboseError,
    sequence::{preceded, terminated},
};
use tint_core::{ParseError, Span, TokenDefinition};
use tracing::debug;

use crate::lexer::*;

/// Read every declaration in a variables file, in source order.
pub fn parse_variables(source: &str) -> Result<Vec<TokenDefinition>, ParseError> {
    let stripped = strip_comments(source)?;
    let lines = split_lines(&stripped);

    let definitions = lines
        .iter()
        .enumerate()
        .map(|(order, line)| parse_declaration(line, order))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = definitions.len(), "read token declarations");
    Ok(definitions)
}

fn parse_declaration(line: &Line<'_>, order: usize) -> Result<TokenDefinition, ParseError> {
    let line_number = line.line_number as u32;
    let content = line.content;

    let (rest, name) = terminated(
        preceded(char('@'), identifier),
        preceded(multispace0, char(':')),
    )(content)
    .map_err(|_: nom::Err<VerboseError<&str>>| ParseError::InvalidDeclaration {
        line: line_number,
        found: content.to_string(),
    })?;

    let Some(value) = rest.trim_end().strip_suffix(';') else {
        return Err(ParseError::MissingSemicolon {
            line: line_number,
            name: name.to_string(),
        });
    };

    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::EmptyValue {
            line: line_number,
            name: name.to_string(),
        });
    }

    Ok(TokenDefinition::new(name, value, order).with_span(Span {
        start: line.offset,
        end: line.offset + content.len(),
        line: line_number,
        column: line.column as u32,
    }))
}
