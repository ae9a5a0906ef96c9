//! Core value types: colors, lengths and units.

use std::fmt;

/// A length value with unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f64) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub const fn em(value: f64) -> Self {
        Self { value, unit: LengthUnit::Em }
    }

    pub const fn percent(value: f64) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Convert to pixels (assuming 96 DPI for physical units).
    pub fn to_px(&self) -> Option<f64> {
        self.unit.px_factor().map(|f| self.value * f)
    }

    /// Re-express this length in another unit.
    ///
    /// Only works between absolute units; a length already in `unit` is
    /// returned unchanged.
    pub fn convert_to(&self, unit: LengthUnit) -> Option<Length> {
        if self.unit == unit {
            return Some(*self);
        }
        let px = self.to_px()?;
        let factor = unit.px_factor()?;
        Some(Length::new(px / factor, unit))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value), self.unit.as_str())
    }
}

/// Length (and other dimension) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    /// Pixels (screen units)
    Px,
    /// Points (1/72 inch)
    Pt,
    /// Picas (12 points)
    Pc,
    /// Millimeters
    Mm,
    /// Centimeters
    Cm,
    /// Inches
    In,
    /// Percentage of parent
    Percent,
    /// Relative to font size
    Em,
    /// Relative to root font size
    Rem,
    /// Relative to x-height
    Ex,
    /// Viewport width
    Vw,
    /// Viewport height
    Vh,
    /// Degrees
    Deg,
    /// Seconds
    S,
    /// Milliseconds
    Ms,
}

impl LengthUnit {
    /// Every supported unit.
    pub const ALL: [LengthUnit; 15] = [
        LengthUnit::Rem,
        LengthUnit::Deg,
        LengthUnit::Px,
        LengthUnit::Pt,
        LengthUnit::Pc,
        LengthUnit::Mm,
        LengthUnit::Ms,
        LengthUnit::Cm,
        LengthUnit::In,
        LengthUnit::Em,
        LengthUnit::Ex,
        LengthUnit::Vw,
        LengthUnit::Vh,
        LengthUnit::Percent,
        LengthUnit::S,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Pt => "pt",
            LengthUnit::Pc => "pc",
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::In => "in",
            LengthUnit::Percent => "%",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Ex => "ex",
            LengthUnit::Vw => "vw",
            LengthUnit::Vh => "vh",
            LengthUnit::Deg => "deg",
            LengthUnit::S => "s",
            LengthUnit::Ms => "ms",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == suffix)
    }

    /// Pixels per unit for absolute units.
    fn px_factor(&self) -> Option<f64> {
        match self {
            LengthUnit::Px => Some(1.0),
            LengthUnit::Pt => Some(96.0 / 72.0),
            LengthUnit::Pc => Some(16.0),
            LengthUnit::Mm => Some(96.0 / 25.4),
            LengthUnit::Cm => Some(96.0 / 2.54),
            LengthUnit::In => Some(96.0),
            _ => None,
        }
    }
}

/// A color value.
///
/// Channels are kept unquantized (`r`, `g`, `b` in `0.0..=255.0`, `a` in
/// `0.0..=1.0`) so chained transforms do not accumulate rounding error.
/// Rounding happens only on serialization.
///
/// `PartialEq` compares the raw channels. A derived color written with
/// [`Color::to_hex`] and read back equals the original only at 8-bit
/// precision: compare [`Color::to_rgba8`] for that. Colors parsed from hex
/// round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64, g as f64, b as f64)
    }

    /// Create from hex string (e.g., "#FF5733", "fff" or "#ff573380").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digits: Vec<u8> = match hex.len() {
            3 | 4 => hex
                .chars()
                .map(|c| {
                    let d = c.to_digit(16).unwrap_or(0) as u8;
                    d * 16 + d
                })
                .collect(),
            6 | 8 => (0..hex.len())
                .step_by(2)
                .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
                .collect::<Result<_, _>>()
                .ok()?,
            _ => return None,
        };
        let alpha = digits.get(3).map_or(1.0, |&a| a as f64 / 255.0);
        Some(Self::rgba(
            digits[0] as f64,
            digits[1] as f64,
            digits[2] as f64,
            alpha,
        ))
    }

    /// Look up a named color (CSS basic keywords).
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "transparent" => Self::TRANSPARENT,
            "red" => Self::rgb(255.0, 0.0, 0.0),
            "green" => Self::rgb(0.0, 128.0, 0.0),
            "lime" => Self::rgb(0.0, 255.0, 0.0),
            "blue" => Self::rgb(0.0, 0.0, 255.0),
            "yellow" => Self::rgb(255.0, 255.0, 0.0),
            "cyan" | "aqua" => Self::rgb(0.0, 255.0, 255.0),
            "magenta" | "fuchsia" => Self::rgb(255.0, 0.0, 255.0),
            "gray" | "grey" => Self::rgb(128.0, 128.0, 128.0),
            "silver" => Self::rgb(192.0, 192.0, 192.0),
            "maroon" => Self::rgb(128.0, 0.0, 0.0),
            "navy" => Self::rgb(0.0, 0.0, 128.0),
            "olive" => Self::rgb(128.0, 128.0, 0.0),
            "purple" => Self::rgb(128.0, 0.0, 128.0),
            "teal" => Self::rgb(0.0, 128.0, 128.0),
            "orange" => Self::rgb(255.0, 165.0, 0.0),
            _ => return None,
        };
        Some(color)
    }

    /// Convert to 8-bit RGBA tuple, rounding half up.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            round_channel(self.r),
            round_channel(self.g),
            round_channel(self.b),
            round_channel(self.a * 255.0),
        )
    }

    /// Convert to lowercase hex string (e.g., "#ff5733", or "#ff573380" when
    /// translucent).
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Clamp every channel into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to HSL. Hue in degrees, saturation and lightness in `0..=1`.
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;

        let (h, s) = if max == min {
            (0.0, 0.0)
        } else {
            let s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            let h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            (h / 6.0, s)
        };

        Hsl {
            h: h * 360.0,
            s,
            l,
            a: self.a,
        }
    }

    /// Convert from HSL. Saturation, lightness and alpha are clamped.
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = (hsl.h % 360.0) / 360.0;
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);
        let a = hsl.a.clamp(0.0, 1.0);

        let m2 = if l <= 0.5 { l * (s + 1.0) } else { l + s - l * s };
        let m1 = l * 2.0 - m2;

        let hue = |h: f64| {
            let h = if h < 0.0 {
                h + 1.0
            } else if h > 1.0 {
                h - 1.0
            } else {
                h
            };
            if h * 6.0 < 1.0 {
                m1 + (m2 - m1) * h * 6.0
            } else if h * 2.0 < 1.0 {
                m2
            } else if h * 3.0 < 2.0 {
                m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
            } else {
                m1
            }
        };

        Self::rgba(
            hue(h + 1.0 / 3.0) * 255.0,
            hue(h) * 255.0,
            hue(h - 1.0 / 3.0) * 255.0,
            a,
        )
    }

    // Common colors
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            return f.write_str(&self.to_hex());
        }
        let (r, g, b, _) = self.to_rgba8();
        write!(
            f,
            "rgba({}, {}, {}, {})",
            r,
            g,
            b,
            format_number(self.a.clamp(0.0, 1.0))
        )
    }
}

/// A color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsl {
    /// Hue in degrees
    pub h: f64,
    /// Saturation (0.0 to 1.0)
    pub s: f64,
    /// Lightness (0.0 to 1.0)
    pub l: f64,
    /// Alpha (0.0 to 1.0)
    pub a: f64,
}

fn round_channel(c: f64) -> u8 {
    (c + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Format a number the way it is written back into a variables file:
/// rounded to 8 decimals, no trailing zeros, no negative zero.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1e8).round() / 1e8;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}
