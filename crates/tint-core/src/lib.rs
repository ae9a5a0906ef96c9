//! Core types for the Tint token engine.
//!
//! This crate provides the foundational types used across the other tint crates:
//! - Value types (colors, lengths, units)
//! - Expression AST and token definitions
//! - The resolved token table
//! - Error types

pub mod ast;
pub mod errors;
pub mod tokens;
pub mod types;

pub use ast::*;
pub use errors::*;
pub use tokens::*;
pub use types::*;
