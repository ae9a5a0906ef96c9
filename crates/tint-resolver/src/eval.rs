//! Expression evaluation.
//!
//! Turns a parsed [`Expr`] into a [`ResolvedValue`] using the tokens resolved
//! so far. Every error carries the name of the token being evaluated.

use smallvec::SmallVec;
use tint_core::{
    BinaryOp, Color, Expr, Length, ResolveError, ResolvedValue, TokenTable, TokenTableBuilder,
};

use crate::functions;

/// Read access to already resolved tokens.
pub(crate) trait Scope {
    fn lookup(&self, name: &str) -> Option<&ResolvedValue>;
}

impl Scope for TokenTableBuilder {
    fn lookup(&self, name: &str) -> Option<&ResolvedValue> {
        self.get(name)
    }
}

impl Scope for TokenTable {
    fn lookup(&self, name: &str) -> Option<&ResolvedValue> {
        self.get(name)
    }
}

pub(crate) struct Evaluator<'a, S: Scope + ?Sized> {
    token: &'a str,
    scope: &'a S,
}

impl<'a, S: Scope + ?Sized> Evaluator<'a, S> {
    pub(crate) fn new(token: &'a str, scope: &'a S) -> Self {
        Self { token, scope }
    }

    /// Evaluate a whole right-hand side. Comma lists become font stacks.
    pub(crate) fn eval_top(&self, expr: &Expr) -> Result<ResolvedValue, ResolveError> {
        match expr {
            Expr::Comma(items) => self.font_stack(items),
            _ => self.eval(expr),
        }
    }

    fn eval(&self, expr: &Expr) -> Result<ResolvedValue, ResolveError> {
        let value = self.eval_expr(expr)?;
        if is_finite(&value) {
            Ok(value)
        } else {
            Err(ResolveError::NonFinite {
                token: self.token.to_string(),
            })
        }
    }

    fn eval_expr(&self, expr: &Expr) -> Result<ResolvedValue, ResolveError> {
        match expr {
            Expr::Color(c) => Ok(ResolvedValue::Color(*c)),
            Expr::Dimension(l) => Ok(ResolvedValue::Length(*l)),
            Expr::Number(n) => Ok(ResolvedValue::Number(*n)),
            Expr::String(s) => Ok(ResolvedValue::String(s.clone())),
            Expr::Ident(name) => Ok(match Color::named(name) {
                Some(color) => ResolvedValue::Color(color),
                None => ResolvedValue::Keyword(name.clone()),
            }),
            Expr::Reference(name) => self.reference(name).cloned(),
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::call(self.token, name, &args)
            }
            Expr::Binary { left, op, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.binary(*op, left, right)
            }
            Expr::Negate(inner) => match self.eval(inner)? {
                ResolvedValue::Number(n) => Ok(ResolvedValue::Number(-n)),
                ResolvedValue::Length(l) => Ok(ResolvedValue::Length(Length::new(-l.value, l.unit))),
                other => Err(self.mismatch("number or length", other.kind().as_str())),
            },
            Expr::Spaced(items) => Ok(ResolvedValue::List(
                items
                    .iter()
                    .map(|i| self.eval(i))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Expr::Comma(_) => Err(self.mismatch("single value", "comma separated list")),
        }
    }

    fn reference(&self, name: &str) -> Result<&'a ResolvedValue, ResolveError> {
        self.scope
            .lookup(name)
            .ok_or_else(|| ResolveError::UndefinedReference {
                token: self.token.to_string(),
                name: name.to_string(),
            })
    }

    /// Build a font stack. Bare identifiers are family names here, never
    /// named colors; references to other stacks are spliced in.
    fn font_stack(&self, items: &[Expr]) -> Result<ResolvedValue, ResolveError> {
        let mut families: SmallVec<[String; 4]> = SmallVec::new();

        for item in items {
            let value = match item {
                Expr::Ident(name) => ResolvedValue::Keyword(name.clone()),
                other => self.eval(other)?,
            };
            match value {
                ResolvedValue::String(s) | ResolvedValue::Keyword(s) => families.push(s),
                ResolvedValue::FontStack(stack) => families.extend(stack),
                other => return Err(self.mismatch("font family", other.kind().as_str())),
            }
        }

        Ok(ResolvedValue::FontStack(families))
    }

    fn binary(
        &self,
        op: BinaryOp,
        left: ResolvedValue,
        right: ResolvedValue,
    ) -> Result<ResolvedValue, ResolveError> {
        use ResolvedValue::{Color as C, Length as L, Number as N};

        match (left, right) {
            (N(a), N(b)) => Ok(N(self.apply(op, a, b)?)),
            (L(a), N(b)) => Ok(L(Length::new(self.apply(op, a.value, b)?, a.unit))),
            (N(a), L(b)) => Ok(L(Length::new(self.apply(op, a, b.value)?, b.unit))),
            (L(a), L(b)) => {
                let b = b.convert_to(a.unit).ok_or_else(|| {
                    self.mismatch(
                        &format!("length in {}", a.unit.as_str()),
                        &format!("length in {}", b.unit.as_str()),
                    )
                })?;
                let value = self.apply(op, a.value, b.value)?;
                if op == BinaryOp::Div {
                    Ok(N(value))
                } else {
                    Ok(L(Length::new(value, a.unit)))
                }
            }
            (C(a), C(b)) if matches!(op, BinaryOp::Add | BinaryOp::Sub) => {
                Ok(C(Color::rgba(
                    self.apply(op, a.r, b.r)?,
                    self.apply(op, a.g, b.g)?,
                    self.apply(op, a.b, b.b)?,
                    a.a,
                )
                .clamped()))
            }
            (C(a), N(n)) if matches!(op, BinaryOp::Mul | BinaryOp::Div) => {
                Ok(C(Color::rgba(
                    self.apply(op, a.r, n)?,
                    self.apply(op, a.g, n)?,
                    self.apply(op, a.b, n)?,
                    a.a,
                )
                .clamped()))
            }
            (left, right) => Err(self.mismatch(
                "numbers, lengths or colors",
                &format!("{} {} {}", left.kind(), op, right.kind()),
            )),
        }
    }

    fn apply(&self, op: BinaryOp, a: f64, b: f64) -> Result<f64, ResolveError> {
        match op {
            BinaryOp::Add => Ok(a + b),
            BinaryOp::Sub => Ok(a - b),
            BinaryOp::Mul => Ok(a * b),
            BinaryOp::Div if b == 0.0 => Err(ResolveError::DivisionByZero {
                token: self.token.to_string(),
            }),
            BinaryOp::Div => Ok(a / b),
        }
    }

    fn mismatch(&self, expected: &str, got: &str) -> ResolveError {
        ResolveError::TypeMismatch {
            token: self.token.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

/// Lists and stacks are built from values that were already checked.
fn is_finite(value: &ResolvedValue) -> bool {
    match value {
        ResolvedValue::Number(n) => n.is_finite(),
        ResolvedValue::Length(l) => l.value.is_finite(),
        ResolvedValue::Color(c) => [c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite()),
        _ => true,
    }
}
