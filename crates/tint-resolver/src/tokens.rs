//! Token resolution.
//!
//! Definitions are evaluated once each, in source order. A reference may only
//! name a token defined earlier (or present in the base table), so a forward
//! reference is reported as undefined and cycles cannot occur.

use tint_core::{
    DefinitionError, ResolveError, ResolvedValue, TokenDefinition, TokenTable, TokenTableBuilder,
};
use tint_parser::parse_expression;
use tracing::{debug, debug_span};

use crate::eval::Evaluator;

/// Resolves token definitions into a frozen [`TokenTable`].
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    base: TokenTable,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already resolved table, e.g. a parent theme. Later
    /// definitions may reference and override its tokens.
    pub fn with_table(base: TokenTable) -> Self {
        Self { base }
    }

    /// Resolve definitions in order. Later definitions of a name replace
    /// earlier ones; everything after the replacement sees the new value.
    pub fn resolve(&self, definitions: &[TokenDefinition]) -> Result<TokenTable, ResolveError> {
        self.resolve_with_context(definitions)
            .map_err(|err| err.source)
    }

    /// Like [`Resolver::resolve`], but the error carries the failing
    /// definition (line and raw expression).
    pub fn resolve_with_context(
        &self,
        definitions: &[TokenDefinition],
    ) -> Result<TokenTable, DefinitionError> {
        let _span = debug_span!("resolve", definitions = definitions.len()).entered();
        let mut builder = self.base.to_builder();

        for definition in definitions {
            let value = resolve_definition(&builder, definition).map_err(|source| {
                DefinitionError {
                    definition: definition.clone(),
                    source,
                }
            })?;

            debug!(
                token = %definition.name,
                order = definition.source_order,
                kind = %value.kind(),
                value = %value,
                "resolved token"
            );

            if let Some(previous) = builder.insert(&definition.name, value) {
                debug!(
                    token = %definition.name,
                    line = definition.span.line,
                    previous = %previous,
                    "token redefined, later definition wins"
                );
            }
        }

        let table = builder.freeze();
        debug!(tokens = table.len(), redefined = table.redefined().len(), "token table frozen");
        Ok(table)
    }
}

fn resolve_definition(
    builder: &TokenTableBuilder,
    definition: &TokenDefinition,
) -> Result<ResolvedValue, ResolveError> {
    let expr = parse_expression(&definition.raw_expression).map_err(|err| ResolveError::Parse {
        token: definition.name.clone(),
        expression: definition.raw_expression.clone(),
        position: err.position,
        message: err.message,
    })?;

    Evaluator::new(&definition.name, builder).eval_top(&expr)
}

/// Name used in errors raised by [`evaluate`].
pub const INLINE_TOKEN: &str = "inline";

/// Evaluate a standalone expression against a frozen table.
pub fn evaluate(expression: &str, table: &TokenTable) -> Result<ResolvedValue, ResolveError> {
    let expr = parse_expression(expression).map_err(|err| ResolveError::Parse {
        token: INLINE_TOKEN.to_string(),
        expression: expression.to_string(),
        position: err.position,
        message: err.message,
    })?;

    Evaluator::new(INLINE_TOKEN, table).eval_top(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tint_core::{Color, Length};

    fn defs(pairs: &[(&str, &str)]) -> Vec<TokenDefinition> {
        TokenDefinition::sequence(pairs.iter().copied())
    }

    #[test]
    fn test_resolve_chain() {
        let table = Resolver::new()
            .resolve(&defs(&[
                ("linkColor", "#08c"),
                ("linkColorHover", "darken(@linkColor, 15%)"),
            ]))
            .unwrap();
        assert_eq!(table.color("linkColorHover").unwrap().to_hex(), "#005580");
    }

    #[test]
    fn test_forward_reference_is_undefined() {
        let err = Resolver::new()
            .resolve(&defs(&[("a", "@b"), ("b", "1px")]))
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::UndefinedReference {
                token: "a".into(),
                name: "b".into(),
            }
        );
    }

    #[test]
    fn test_self_reference_is_undefined() {
        let err = Resolver::new().resolve(&defs(&[("a", "@a")])).unwrap_err();
        assert!(matches!(err, ResolveError::UndefinedReference { .. }));
    }

    #[test]
    fn test_override_uses_latest_value() {
        let table = Resolver::new()
            .resolve(&defs(&[
                ("size", "10px"),
                ("double", "@size * 2"),
                ("size", "12px"),
                ("triple", "@size * 3"),
            ]))
            .unwrap();
        assert_eq!(table.length("size").unwrap(), Length::px(12.0));
        assert_eq!(table.length("double").unwrap(), Length::px(20.0));
        assert_eq!(table.length("triple").unwrap(), Length::px(36.0));
        assert_eq!(table.redefined(), ["size"]);
        assert_eq!(table.iter().next().map(|(name, _)| name.as_str()), Some("size"));
    }

    #[test]
    fn test_parse_error_names_token() {
        let err = Resolver::new()
            .resolve(&defs(&[("broken", "darken(@a, 10%")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Parse { token, position: 14, .. } if token == "broken"
        ));
    }

    #[test]
    fn test_context_error_carries_definition() {
        let err = Resolver::new()
            .resolve_with_context(&defs(&[("a", "1px"), ("b", "@a + #fff")]))
            .unwrap_err();
        assert_eq!(err.definition.name, "b");
        assert_eq!(err.definition.raw_expression, "@a + #fff");
        assert!(matches!(err.source, ResolveError::TypeMismatch { .. }));
    }

    #[test]
    fn test_with_base_table() {
        let base = Resolver::new()
            .resolve(&defs(&[("brand", "#0088cc"), ("radius", "4px")]))
            .unwrap();
        let table = Resolver::with_table(base)
            .resolve(&defs(&[("brandHover", "spin(@brand, 20)"), ("radius", "6px")]))
            .unwrap();
        assert_eq!(table.color("brandHover").unwrap().to_hex(), "#0044cc");
        assert_eq!(table.length("radius").unwrap(), Length::px(6.0));
        assert_eq!(table.redefined(), ["radius"]);
    }

    #[test]
    fn test_evaluate_against_table() {
        let table = Resolver::new()
            .resolve(&defs(&[("white", "#fff"), ("gutter", "20px")]))
            .unwrap();
        assert_eq!(
            evaluate("@gutter / 2", &table).unwrap(),
            ResolvedValue::Length(Length::px(10.0))
        );
        assert_eq!(
            evaluate("@white", &table).unwrap(),
            ResolvedValue::Color(Color::WHITE)
        );
        assert_eq!(
            evaluate("@missing", &table),
            Err(ResolveError::UndefinedReference {
                token: INLINE_TOKEN.into(),
                name: "missing".into(),
            })
        );
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let expression = format!("{}#fff{}", "spin(".repeat(800), ", 1)".repeat(800));
        let err = evaluate(&expression, &TokenTable::empty()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Parse { token, message, .. }
                if token == INLINE_TOKEN && message == "expression nested too deeply"
        ));

        let nested = format!("{}#fff{}", "spin(".repeat(32), ", 1)".repeat(32));
        let spun = evaluate(&nested, &TokenTable::empty()).unwrap();
        assert_eq!(spun.as_color().unwrap().to_hex(), "#ffffff");
    }

    #[test]
    fn test_overflow_stops_resolution() {
        // 1e20 to the 16th power is past f64::MAX
        let power = vec!["@big"; 16].join(" * ");
        let err = Resolver::new()
            .resolve(&defs(&[("big", "100000000000000000000"), ("a", &power)]))
            .unwrap_err();
        assert_eq!(err, ResolveError::NonFinite { token: "a".into() });
    }

    #[test]
    fn test_empty_input() {
        let table = Resolver::new().resolve(&[]).unwrap();
        assert!(table.is_empty());
    }
}
