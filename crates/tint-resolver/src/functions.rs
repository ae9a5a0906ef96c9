//! Built-in functions: color transforms, color constructors and numeric
//! helpers.
//!
//! Color transforms work in HSL space on unquantized channels, so chained
//! calls such as `darken(spin(@c, -10), 3%)` only round once, when the
//! result is written out.

use tint_core::{Color, Hsl, Length, LengthUnit, ResolveError, ResolvedValue};

/// Names of every built-in function.
pub const BUILTINS: &[&str] = &[
    "darken",
    "lighten",
    "saturate",
    "desaturate",
    "spin",
    "fade",
    "fadein",
    "fadeout",
    "mix",
    "rgb",
    "rgba",
    "hsl",
    "hsla",
    "percentage",
    "round",
    "ceil",
    "floor",
];

/// Call a built-in function on already evaluated arguments.
pub(crate) fn call(
    token: &str,
    name: &str,
    args: &[ResolvedValue],
) -> Result<ResolvedValue, ResolveError> {
    let f = Call { token, name, args };

    match name {
        "darken" => f.adjust_hsl(|hsl, amount| hsl.l -= amount),
        "lighten" => f.adjust_hsl(|hsl, amount| hsl.l += amount),
        "saturate" => f.adjust_hsl(|hsl, amount| hsl.s += amount),
        "desaturate" => f.adjust_hsl(|hsl, amount| hsl.s -= amount),
        "fadein" => f.adjust_hsl(|hsl, amount| hsl.a += amount),
        "fadeout" => f.adjust_hsl(|hsl, amount| hsl.a -= amount),
        "fade" => f.adjust_hsl(|hsl, amount| hsl.a = amount),
        "spin" => {
            f.arity(2, "2")?;
            let mut hsl = f.color(0)?.to_hsl();
            // Only the magnitude matters: `spin(@c, 20%)` spins 20 degrees.
            let hue = (hsl.h + f.amount(1)?) % 360.0;
            hsl.h = if hue < 0.0 { hue + 360.0 } else { hue };
            Ok(ResolvedValue::Color(Color::from_hsl(hsl)))
        }
        "mix" => f.mix(),
        "rgb" => {
            f.arity(3, "3")?;
            Ok(ResolvedValue::Color(
                Color::rgb(f.channel(0)?, f.channel(1)?, f.channel(2)?).clamped(),
            ))
        }
        "rgba" => {
            f.arity(4, "4")?;
            Ok(ResolvedValue::Color(
                Color::rgba(f.channel(0)?, f.channel(1)?, f.channel(2)?, f.fraction(3)?)
                    .clamped(),
            ))
        }
        "hsl" | "hsla" => {
            let (count, expected) = if name == "hsl" { (3, "3") } else { (4, "4") };
            f.arity(count, expected)?;
            let alpha = if count == 4 { f.fraction(3)? } else { 1.0 };
            Ok(ResolvedValue::Color(Color::from_hsl(Hsl {
                h: f.amount(0)?,
                s: f.fraction(1)?,
                l: f.fraction(2)?,
                a: alpha,
            })))
        }
        "percentage" => {
            f.arity(1, "1")?;
            match &args[0] {
                ResolvedValue::Number(n) => Ok(ResolvedValue::Length(Length::percent(n * 100.0))),
                other => Err(f.mismatch("number", other)),
            }
        }
        "round" | "ceil" | "floor" => f.rounding(),
        _ => Err(ResolveError::UnknownFunction {
            token: token.to_string(),
            name: name.to_string(),
        }),
    }
}

struct Call<'a> {
    token: &'a str,
    name: &'a str,
    args: &'a [ResolvedValue],
}

impl Call<'_> {
    fn arity(&self, count: usize, expected: &str) -> Result<(), ResolveError> {
        if self.args.len() == count {
            Ok(())
        } else {
            Err(self.arity_error(expected))
        }
    }

    fn arity_error(&self, expected: &str) -> ResolveError {
        ResolveError::Arity {
            token: self.token.to_string(),
            function: self.name.to_string(),
            expected: expected.to_string(),
            got: self.args.len(),
        }
    }

    fn mismatch(&self, expected: &str, got: &ResolvedValue) -> ResolveError {
        ResolveError::TypeMismatch {
            token: self.token.to_string(),
            expected: expected.to_string(),
            got: got.kind().as_str().to_string(),
        }
    }

    fn color(&self, index: usize) -> Result<Color, ResolveError> {
        match &self.args[index] {
            ResolvedValue::Color(c) => Ok(*c),
            other => Err(self.mismatch("color", other)),
        }
    }

    /// The numeric part of a number or dimension, unit ignored.
    fn amount(&self, index: usize) -> Result<f64, ResolveError> {
        match &self.args[index] {
            ResolvedValue::Number(n) => Ok(*n),
            ResolvedValue::Length(l) => Ok(l.value),
            other => Err(self.mismatch("number or percentage", other)),
        }
    }

    /// A `0..=1` fraction: percentages are scaled, plain numbers taken as is.
    fn fraction(&self, index: usize) -> Result<f64, ResolveError> {
        match &self.args[index] {
            ResolvedValue::Number(n) => Ok(*n),
            ResolvedValue::Length(l) if l.unit == LengthUnit::Percent => Ok(l.value / 100.0),
            other => Err(self.mismatch("number or percentage", other)),
        }
    }

    /// An RGB channel: `0..=255`, or a percentage of 255.
    fn channel(&self, index: usize) -> Result<f64, ResolveError> {
        match &self.args[index] {
            ResolvedValue::Number(n) => Ok(*n),
            ResolvedValue::Length(l) if l.unit == LengthUnit::Percent => {
                Ok(l.value * 255.0 / 100.0)
            }
            other => Err(self.mismatch("number or percentage", other)),
        }
    }

    /// `f(color, amount)` where the amount is a percentage of the HSL range.
    fn adjust_hsl(
        &self,
        adjust: impl FnOnce(&mut Hsl, f64),
    ) -> Result<ResolvedValue, ResolveError> {
        self.arity(2, "2")?;
        let mut hsl = self.color(0)?.to_hsl();
        adjust(&mut hsl, self.amount(1)? / 100.0);
        hsl.s = hsl.s.clamp(0.0, 1.0);
        hsl.l = hsl.l.clamp(0.0, 1.0);
        hsl.a = hsl.a.clamp(0.0, 1.0);
        Ok(ResolvedValue::Color(Color::from_hsl(hsl)))
    }

    /// `mix(c1, c2[, weight])`, weighting by alpha as well as `weight`.
    fn mix(&self) -> Result<ResolvedValue, ResolveError> {
        if !(2..=3).contains(&self.args.len()) {
            return Err(self.arity_error("2 or 3"));
        }
        let c1 = self.color(0)?;
        let c2 = self.color(1)?;
        let p = if self.args.len() == 3 {
            self.amount(2)? / 100.0
        } else {
            0.5
        };

        let w = p * 2.0 - 1.0;
        let a = c1.a - c2.a;
        let bias = if w * a == -1.0 { w } else { (w + a) / (1.0 + w * a) };
        let w1 = (bias + 1.0) / 2.0;
        let w2 = 1.0 - w1;

        Ok(ResolvedValue::Color(Color::rgba(
            c1.r * w1 + c2.r * w2,
            c1.g * w1 + c2.g * w2,
            c1.b * w1 + c2.b * w2,
            c1.a * p + c2.a * (1.0 - p),
        )))
    }

    /// `round(n[, places])`, `ceil(n)` and `floor(n)`; units are kept.
    fn rounding(&self) -> Result<ResolvedValue, ResolveError> {
        let max = if self.name == "round" { 2 } else { 1 };
        if self.args.is_empty() || self.args.len() > max {
            return Err(self.arity_error(if max == 2 { "1 or 2" } else { "1" }));
        }
        let places = if self.args.len() == 2 {
            self.amount(1)?.max(0.0)
        } else {
            0.0
        };
        let scale = 10f64.powf(places);
        let op = |v: f64| match self.name {
            "ceil" => v.ceil(),
            "floor" => v.floor(),
            // Past f64 precision there is nothing left to round
            _ if !(v * scale).is_finite() => v,
            _ => (v * scale).round() / scale,
        };

        match &self.args[0] {
            ResolvedValue::Number(n) => Ok(ResolvedValue::Number(op(*n))),
            ResolvedValue::Length(l) => Ok(ResolvedValue::Length(Length::new(op(l.value), l.unit))),
            other => Err(self.mismatch("number or length", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> ResolvedValue {
        ResolvedValue::Color(Color::from_hex(s).unwrap())
    }

    fn pct(v: f64) -> ResolvedValue {
        ResolvedValue::Length(Length::percent(v))
    }

    fn color_of(value: ResolvedValue) -> String {
        value.as_color().unwrap().to_hex()
    }

    #[test]
    fn test_darken() {
        assert_eq!(color_of(call("t", "darken", &[hex("fcf8e3"), pct(3.0)]).unwrap()), "#fbf5d5");
        assert_eq!(color_of(call("t", "darken", &[hex("fcf8e3"), pct(5.0)]).unwrap()), "#faf2cc");
        assert_eq!(color_of(call("t", "darken", &[hex("0088cc"), pct(15.0)]).unwrap()), "#005580");
    }

    #[test]
    fn test_spin_wraps_hue() {
        assert_eq!(
            color_of(call("t", "spin", &[hex("fcf8e3"), ResolvedValue::Number(-10.0)]).unwrap()),
            "#fcf4e3"
        );
        assert_eq!(
            color_of(call("t", "spin", &[hex("fcf8e3"), ResolvedValue::Number(370.0)]).unwrap()),
            "#fcfce3"
        );
        assert_eq!(
            color_of(call("t", "spin", &[hex("0088cc"), ResolvedValue::Number(20.0)]).unwrap()),
            "#0044cc"
        );
    }

    #[test]
    fn test_chained_transforms_round_once() {
        let spun = call("t", "spin", &[hex("fcf8e3"), ResolvedValue::Number(-10.0)]).unwrap();
        let darkened = call("t", "darken", &[spun, pct(3.0)]).unwrap();
        assert_eq!(color_of(darkened), "#fbeed5");
    }

    #[test]
    fn test_lighten_saturates_at_white() {
        assert_eq!(color_of(call("t", "lighten", &[hex("333"), pct(200.0)]).unwrap()), "#ffffff");
    }

    #[test]
    fn test_fade() {
        let faded = call("t", "fade", &[hex("000"), pct(25.0)]).unwrap();
        assert_eq!(faded.as_color().unwrap().a, 0.25);
        let out = call("t", "fadeout", &[faded, pct(5.0)]).unwrap();
        assert!((out.as_color().unwrap().a - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_mix() {
        assert_eq!(color_of(call("t", "mix", &[hex("000"), hex("fff")]).unwrap()), "#808080");
        assert_eq!(
            color_of(call("t", "mix", &[hex("f00"), hex("00f"), pct(100.0)]).unwrap()),
            "#ff0000"
        );
    }

    #[test]
    fn test_constructors() {
        let n = ResolvedValue::Number;
        assert_eq!(
            call("t", "rgba", &[n(0.0), n(0.0), n(0.0), n(0.25)]).unwrap(),
            ResolvedValue::Color(Color::rgba(0.0, 0.0, 0.0, 0.25))
        );
        assert_eq!(color_of(call("t", "rgb", &[n(255.0), pct(50.0), n(0.0)]).unwrap()), "#ff8000");
        assert_eq!(color_of(call("t", "hsl", &[n(0.0), pct(100.0), pct(50.0)]).unwrap()), "#ff0000");
    }

    #[test]
    fn test_numeric_helpers() {
        assert_eq!(call("t", "percentage", &[ResolvedValue::Number(0.5)]).unwrap(), pct(50.0));
        assert_eq!(
            call("t", "round", &[ResolvedValue::Length(Length::px(17.5))]).unwrap(),
            ResolvedValue::Length(Length::px(18.0))
        );
        assert_eq!(
            call("t", "floor", &[ResolvedValue::Number(2.7)]).unwrap(),
            ResolvedValue::Number(2.0)
        );
    }

    #[test]
    fn test_every_builtin_is_dispatched() {
        for name in BUILTINS {
            assert!(!matches!(
                call("t", name, &[]),
                Err(ResolveError::UnknownFunction { .. })
            ));
        }
    }

    #[test]
    fn test_type_and_arity_errors() {
        assert_eq!(
            call("linkColorHover", "darken", &[ResolvedValue::Length(Length::px(1.0)), pct(1.0)]),
            Err(ResolveError::TypeMismatch {
                token: "linkColorHover".into(),
                expected: "color".into(),
                got: "length".into(),
            })
        );
        assert!(matches!(
            call("t", "spin", &[hex("fff")]),
            Err(ResolveError::Arity { got: 1, .. })
        ));
        assert!(matches!(
            call("t", "unknown", &[]),
            Err(ResolveError::UnknownFunction { name, .. }) if name == "unknown"
        ));
    }
}
