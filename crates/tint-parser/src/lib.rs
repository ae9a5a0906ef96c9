//! Parser for Tint themes.
//!
//! This crate provides parser combinators for two layers:
//! - token expressions (`darken(@linkColor, 15%)`, `@a * (@b - 1)`, ...)
//! - variables files, one `@name: expression;` declaration per line
//!
//! Built on `nom` for composable, zero-copy parsing where possible.

mod grammar;
mod lexer;
mod variables;

pub use grammar::{parse_expression, MAX_NESTING, MAX_OPERATORS};
pub use variables::parse_variables;
