//! Expression AST and token definitions.

use crate::types::{Color, Length};
use std::fmt;

/// A single `name: expression` token definition, as read from a theme.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenDefinition {
    /// Token name without the leading `@`
    pub name: String,
    /// Unparsed right-hand side
    pub raw_expression: String,
    /// Zero-based position in the definition sequence
    pub source_order: usize,
    /// Source span for error reporting
    pub span: Span,
}

impl TokenDefinition {
    pub fn new(name: impl Into<String>, raw_expression: impl Into<String>, source_order: usize) -> Self {
        Self {
            name: name.into(),
            raw_expression: raw_expression.into(),
            source_order,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Build an ordered definition list from `(name, expression)` pairs.
    pub fn sequence<'a, I>(pairs: I) -> Vec<TokenDefinition>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .enumerate()
            .map(|(order, (name, expr))| TokenDefinition::new(name, expr, order))
            .collect()
    }
}

/// Source span for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

/// A parsed token expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `#rgb`, `#rrggbb` and friends
    Color(Color),
    /// A number with a unit, e.g. `20px`
    Dimension(Length),
    /// A unitless number
    Number(f64),
    /// A quoted string
    String(String),
    /// A bare identifier: keyword, named color or font family
    Ident(String),
    /// `@name`
    Reference(String),
    /// `name(arg, ...)`
    Call { name: String, args: Vec<Expr> },
    /// `left op right`
    Binary { left: Box<Expr>, op: BinaryOp, right: Box<Expr> },
    /// `-expr`
    Negate(Box<Expr>),
    /// Space separated values, e.g. `4px 12px`
    Spaced(Vec<Expr>),
    /// Comma separated values, e.g. a font stack
    Comma(Vec<Expr>),
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

/// Binary operators for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_assigns_source_order() {
        let defs = TokenDefinition::sequence([("a", "1px"), ("a", "2px"), ("b", "@a")]);
        let orders: Vec<_> = defs.iter().map(|d| d.source_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(defs[1].raw_expression, "2px");
    }

    #[test]
    fn test_binary_op_display() {
        let ops = [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div];
        let shown: String = ops.iter().map(ToString::to_string).collect();
        assert_eq!(shown, "+-*/");
    }
}
