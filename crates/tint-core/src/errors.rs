//! Error types for the Tint engine.

use crate::ast::TokenDefinition;
use thiserror::Error;

/// Top-level error type for the Tint engine.
#[derive(Debug, Error)]
pub enum TintError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Errors while reading a variables file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Invalid declaration at line {line}: expected `@name: value;`, found {found:?}")]
    InvalidDeclaration { line: u32, found: String },

    #[error("Missing `;` after declaration of @{name} at line {line}")]
    MissingSemicolon { line: u32, name: String },

    #[error("Empty value for @{name} at line {line}")]
    EmptyValue { line: u32, name: String },

    #[error("Unterminated block comment starting at line {line}")]
    UnterminatedComment { line: u32 },
}

/// A syntax error inside a single expression.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at offset {position}")]
pub struct ExprError {
    /// Byte offset into the expression
    pub position: usize,
    pub message: String,
}

impl ExprError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Errors during token resolution and lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Undefined reference @{name} in @{token}")]
    UndefinedReference { token: String, name: String },

    #[error("Type mismatch in @{token}: expected {expected}, got {got}")]
    TypeMismatch {
        token: String,
        expected: String,
        got: String,
    },

    #[error("Malformed expression for @{token} at offset {position}: {message} in {expression:?}")]
    Parse {
        token: String,
        expression: String,
        position: usize,
        message: String,
    },

    #[error("Unknown function {name}() in @{token}")]
    UnknownFunction { token: String, name: String },

    #[error("{function}() in @{token} takes {expected} arguments, got {got}")]
    Arity {
        token: String,
        function: String,
        expected: String,
        got: usize,
    },

    #[error("Division by zero in @{token}")]
    DivisionByZero { token: String },

    #[error("Numeric overflow in @{token}: result is not a finite number")]
    NonFinite { token: String },

    #[error("No token named @{name}")]
    NotFound { name: String },
}

impl ResolveError {
    /// The token being resolved when the error occurred.
    pub fn token(&self) -> Option<&str> {
        match self {
            ResolveError::UndefinedReference { token, .. }
            | ResolveError::TypeMismatch { token, .. }
            | ResolveError::Parse { token, .. }
            | ResolveError::UnknownFunction { token, .. }
            | ResolveError::Arity { token, .. }
            | ResolveError::DivisionByZero { token }
            | ResolveError::NonFinite { token } => Some(token.as_str()),
            ResolveError::NotFound { .. } => None,
        }
    }
}

/// A resolution error together with the definition that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{source} (line {}: @{}: {})", .definition.span.line, .definition.name, .definition.raw_expression)]
pub struct DefinitionError {
    pub definition: TokenDefinition,
    #[source]
    pub source: ResolveError,
}
