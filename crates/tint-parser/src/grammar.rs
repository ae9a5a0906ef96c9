//! Grammar rules for token expressions.
//!
//! Precedence, loosest first: comma lists, space lists, `+ -`, `* /`,
//! unary minus. A `-` that follows whitespace and is glued to a number or
//! reference starts a new list item instead of subtracting, so `11px -19px`
//! is a two element shorthand while `@a - 1` is arithmetic.

use nom::{
    branch::alt,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, opt},
    error::{context, ErrorKind, ParseError as _, VerboseError, VerboseErrorKind},
    multi::{fold_many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};

use tint_core::{BinaryOp, Expr, ExprError, Length};

use crate::lexer::*;

/// Deepest allowed nesting of parentheses and function calls.
pub const MAX_NESTING: usize = 64;

/// Most operator characters allowed in one expression. Each one can add a
/// level to the expression tree, so this bounds evaluation depth.
pub const MAX_OPERATORS: usize = 256;

/// Parse a single token expression.
pub fn parse_expression(source: &str) -> Result<Expr, ExprError> {
    check_depth(source)?;

    match all_consuming(delimited(multispace0, value, multispace0))(source) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(to_expr_error(source, e)),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::new(
            source.len(),
            "unexpected end of expression",
        )),
    }
}

/// Reject input that would nest deeper than the recursive grammar and the
/// evaluator can handle. Quoted strings are skipped.
fn check_depth(source: &str) -> Result<(), ExprError> {
    let mut nesting = 0usize;
    let mut operators = 0usize;
    let mut quote = None;

    for (position, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => {
                nesting += 1;
                if nesting > MAX_NESTING {
                    return Err(ExprError::new(position, "expression nested too deeply"));
                }
            }
            (None, ')') => nesting = nesting.saturating_sub(1),
            (None, '+' | '-' | '*' | '/') => {
                operators += 1;
                if operators > MAX_OPERATORS {
                    return Err(ExprError::new(position, "expression has too many operators"));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn to_expr_error(source: &str, err: VerboseError<&str>) -> ExprError {
    let position = err
        .errors
        .first()
        .map_or(0, |(rest, _)| source.len() - rest.len());

    let message = err
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(ctx.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| match source[position..].chars().next() {
            Some(c) => format!("unexpected character {:?}", c),
            None => "unexpected end of expression".to_string(),
        });

    ExprError::new(position, message)
}

/// Comma separated list (font stacks); a single item is returned as is.
fn value(input: &str) -> PResult<'_, Expr> {
    map(
        separated_list1(delimited(multispace0, char(','), multispace0), spaced),
        |mut items| {
            if items.len() == 1 {
                items.remove(0)
            } else {
                Expr::Comma(items)
            }
        },
    )(input)
}

/// Space separated list; a single item is returned as is.
fn spaced(input: &str) -> PResult<'_, Expr> {
    let (input, first) = additive(input)?;
    let (input, mut rest) = fold_many0(
        preceded(multispace1, additive),
        Vec::new,
        |mut acc, item| {
            acc.push(item);
            acc
        },
    )(input)?;

    if rest.is_empty() {
        Ok((input, first))
    } else {
        rest.insert(0, first);
        Ok((input, Expr::Spaced(rest)))
    }
}

fn additive(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(additive_op, cut(term)),
        move || first.clone(),
        |acc, (op, rhs)| Expr::binary(acc, op, rhs),
    )(input)
}

fn additive_op(input: &str) -> PResult<'_, BinaryOp> {
    let (after_ws, ws_before) = multispace0(input)?;
    let (after_op, op) = alt((
        map(char('+'), |_| BinaryOp::Add),
        map(char('-'), |_| BinaryOp::Sub),
    ))(after_ws)?;
    let (rest, ws_after) = multispace0(after_op)?;

    let glued_negative = op == BinaryOp::Sub
        && !ws_before.is_empty()
        && ws_after.is_empty()
        && rest.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '@');
    if glued_negative {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::Char,
        )));
    }

    Ok((rest, op))
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    fold_many0(
        pair(term_op, cut(unary)),
        move || first.clone(),
        |acc, (op, rhs)| Expr::binary(acc, op, rhs),
    )(input)
}

fn term_op(input: &str) -> PResult<'_, BinaryOp> {
    delimited(
        multispace0,
        alt((
            map(char('*'), |_| BinaryOp::Mul),
            map(char('/'), |_| BinaryOp::Div),
        )),
        multispace0,
    )(input)
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(char('-'), cut(unary)), |inner| match inner {
            Expr::Number(n) => Expr::Number(-n),
            Expr::Dimension(l) => Expr::Dimension(Length::new(-l.value, l.unit)),
            other => Expr::Negate(Box::new(other)),
        }),
        primary,
    ))(input)
}

fn primary(input: &str) -> PResult<'_, Expr> {
    context(
        "expected a value",
        alt((
            parenthesized,
            map(hex_color, Expr::Color),
            dimension,
            map(quoted, |s| Expr::String(s.to_string())),
            map(reference, |name| Expr::Reference(name.to_string())),
            call_or_ident,
        )),
    )(input)
}

fn parenthesized(input: &str) -> PResult<'_, Expr> {
    delimited(
        pair(char('('), multispace0),
        cut(additive),
        cut(preceded(multispace0, context("expected `)`", char(')')))),
    )(input)
}

fn dimension(input: &str) -> PResult<'_, Expr> {
    let (input, value) = number(input)?;
    let (input, unit) = opt(unit)(input)?;
    let expr = match unit {
        Some(unit) => Expr::Dimension(Length::new(value, unit)),
        None => Expr::Number(value),
    };
    Ok((input, expr))
}

fn call_or_ident(input: &str) -> PResult<'_, Expr> {
    let (input, name) = identifier(input)?;
    let (input, open) = opt(char('('))(input)?;
    if open.is_none() {
        return Ok((input, Expr::Ident(name.to_string())));
    }

    let (input, args) = cut(terminated(
        delimited(
            multispace0,
            separated_list0(delimited(multispace0, char(','), multispace0), spaced),
            multispace0,
        ),
        context("expected `,` or `)` in argument list", char(')')),
    ))(input)?;

    Ok((
        input,
        Expr::Call {
            name: name.to_string(),
            args,
        },
    ))
}
