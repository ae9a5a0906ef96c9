//! Token resolution for Tint themes.
//!
//! This crate turns parsed `@name: expression;` definitions into a frozen
//! [`TokenTable`]:
//! - References resolve against earlier definitions only
//! - Arithmetic follows unit rules (`px * number`, `px / px`, ...)
//! - Built-in color functions (`darken`, `spin`, `mix`, ...) run in HSL space

mod eval;
mod functions;
mod tokens;

pub use functions::BUILTINS;
pub use tokens::{evaluate, Resolver, INLINE_TOKEN};

use tint_core::{ResolveError, TintError, TokenDefinition, TokenTable};

/// Resolve definitions with an empty base table.
pub fn resolve(definitions: &[TokenDefinition]) -> Result<TokenTable, ResolveError> {
    Resolver::new().resolve(definitions)
}

/// Read a variables file and resolve it.
pub fn resolve_source(source: &str) -> Result<TokenTable, TintError> {
    let definitions = tint_parser::parse_variables(source)?;
    Ok(Resolver::new().resolve_with_context(&definitions)?)
}
