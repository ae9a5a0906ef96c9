//! Resolved token values and the token table.

use crate::errors::ResolveError;
use crate::types::{format_number, Color, Length};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;

/// A resolved token value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolvedValue {
    Color(Color),
    Length(Length),
    Number(f64),
    /// Ordered font family names, unquoted
    FontStack(SmallVec<[String; 4]>),
    Keyword(String),
    String(String),
    /// Space separated shorthand such as `4px 12px`
    List(Vec<ResolvedValue>),
}

/// The kind of a resolved value, used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Color,
    Length,
    Number,
    FontStack,
    Keyword,
    String,
    List,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Color => "color",
            ValueKind::Length => "length",
            ValueKind::Number => "number",
            ValueKind::FontStack => "font stack",
            ValueKind::Keyword => "keyword",
            ValueKind::String => "string",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResolvedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ResolvedValue::Color(_) => ValueKind::Color,
            ResolvedValue::Length(_) => ValueKind::Length,
            ResolvedValue::Number(_) => ValueKind::Number,
            ResolvedValue::FontStack(_) => ValueKind::FontStack,
            ResolvedValue::Keyword(_) => ValueKind::Keyword,
            ResolvedValue::String(_) => ValueKind::String,
            ResolvedValue::List(_) => ValueKind::List,
        }
    }

    /// Build a font stack from family names.
    pub fn font_stack<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResolvedValue::FontStack(families.into_iter().map(Into::into).collect())
    }

    /// Try to get as a color.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            ResolvedValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Try to get as a length.
    pub fn as_length(&self) -> Option<Length> {
        match self {
            ResolvedValue::Length(l) => Some(*l),
            _ => None,
        }
    }

    /// Try to get as a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResolvedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as a font stack.
    pub fn as_font_stack(&self) -> Option<&[String]> {
        match self {
            ResolvedValue::FontStack(families) => Some(families.as_slice()),
            _ => None,
        }
    }

    /// Try to get as a keyword.
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            ResolvedValue::Keyword(k) => Some(k.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Color(c) => write!(f, "{}", c),
            ResolvedValue::Length(l) => write!(f, "{}", l),
            ResolvedValue::Number(n) => f.write_str(&format_number(*n)),
            ResolvedValue::FontStack(families) => {
                for (i, family) in families.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if is_bare_family(family) {
                        f.write_str(family)?;
                    } else {
                        write_quoted(f, family)?;
                    }
                }
                Ok(())
            }
            ResolvedValue::Keyword(k) => f.write_str(k),
            ResolvedValue::String(s) => write_quoted(f, s),
            ResolvedValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

fn is_bare_family(family: &str) -> bool {
    family
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && family
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('"') { '\'' } else { '"' };
    write!(f, "{quote}{s}{quote}")
}

/// Accumulates resolved tokens during a single resolution pass.
///
/// Inserting an existing name replaces its value in place (last write wins)
/// and records the name as redefined.
#[derive(Debug, Clone, Default)]
pub struct TokenTableBuilder {
    tokens: IndexMap<String, ResolvedValue>,
    redefined: Vec<String>,
}

impl TokenTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, returning the value it replaced.
    pub fn insert(&mut self, name: &str, value: ResolvedValue) -> Option<ResolvedValue> {
        let previous = self.tokens.insert(name.to_string(), value);
        if previous.is_some() && !self.redefined.iter().any(|n| n == name) {
            self.redefined.push(name.to_string());
        }
        previous
    }

    /// Get a token resolved so far.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.tokens.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finish the pass. The returned table can no longer be modified.
    pub fn freeze(self) -> TokenTable {
        TokenTable {
            tokens: self.tokens,
            redefined: self.redefined,
        }
    }
}

/// A frozen map of resolved tokens, in first-definition order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenTable {
    tokens: IndexMap<String, ResolvedValue>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty", default))]
    redefined: Vec<String>,
}

impl TokenTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a token by name.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.tokens.get(name)
    }

    /// Get a token by name, failing with [`ResolveError::NotFound`].
    pub fn lookup(&self, name: &str) -> Result<&ResolvedValue, ResolveError> {
        self.tokens.get(name).ok_or_else(|| ResolveError::NotFound {
            name: name.to_string(),
        })
    }

    /// Get a color token.
    pub fn color(&self, name: &str) -> Result<Color, ResolveError> {
        let value = self.lookup(name)?;
        value.as_color().ok_or_else(|| mismatch(name, "color", value))
    }

    /// Get a length token.
    pub fn length(&self, name: &str) -> Result<Length, ResolveError> {
        let value = self.lookup(name)?;
        value.as_length().ok_or_else(|| mismatch(name, "length", value))
    }

    /// Get a number token.
    pub fn number(&self, name: &str) -> Result<f64, ResolveError> {
        let value = self.lookup(name)?;
        value.as_number().ok_or_else(|| mismatch(name, "number", value))
    }

    /// Check if a token exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    /// Names that were defined more than once, in order of first redefinition.
    pub fn redefined(&self) -> &[String] {
        &self.redefined
    }

    /// Iterate over all tokens.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResolvedValue)> {
        self.tokens.iter()
    }

    /// Number of tokens in the table.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Start a new pass seeded with this table's tokens.
    pub fn to_builder(&self) -> TokenTableBuilder {
        TokenTableBuilder {
            tokens: self.tokens.clone(),
            redefined: Vec::new(),
        }
    }

    /// Write the table back out as `@name: value;` lines.
    pub fn to_variables(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.tokens {
            out.push_str(&format!("@{}: {};\n", name, value));
        }
        out
    }
}

fn mismatch(name: &str, expected: &str, got: &ResolvedValue) -> ResolveError {
    ResolveError::TypeMismatch {
        token: name.to_string(),
        expected: expected.to_string(),
        got: got.kind().to_string(),
    }
}
