//! Property-based tests for token resolution using proptest.

use proptest::prelude::*;
use tint_core::{Color, Length, TokenDefinition};
use tint_resolver::resolve;

// ============================================================================
// Test helpers
// ============================================================================

fn color_strategy() -> impl Strategy<Value = (u8, u8, u8)> {
    (any::<u8>(), any::<u8>(), any::<u8>())
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn resolve_color(expression: &str) -> Color {
    let defs = TokenDefinition::sequence([("c", expression)]);
    resolve(&defs).unwrap().color("c").unwrap()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Resolving the same definitions twice gives identical tables.
    #[test]
    fn resolution_is_deterministic(
        rgb in color_strategy(),
        amount in 0u8..=100,
        degrees in -720i32..=720,
    ) {
        let base = hex(rgb);
        let derived = format!("darken(spin(@base, {}), {}%)", degrees, amount);
        let defs = TokenDefinition::sequence([
            ("base", base.as_str()),
            ("derived", derived.as_str()),
            ("mixed", "mix(@base, @derived, 25%)"),
        ]);

        prop_assert_eq!(resolve(&defs).unwrap(), resolve(&defs).unwrap());
    }

    /// Hex literals come back exactly and re-serialize to the same text.
    #[test]
    fn hex_literal_round_trip(rgb in color_strategy()) {
        let literal = hex(rgb);
        let color = resolve_color(&literal);
        prop_assert_eq!(color, Color::from_rgb8(rgb.0, rgb.1, rgb.2));
        prop_assert_eq!(color.to_hex(), literal);
    }

    /// Whole turns of the hue wheel leave a color unchanged.
    #[test]
    fn spin_wraps_hue(rgb in color_strategy(), turns in -3i32..=3) {
        let spun = resolve_color(&format!("spin({}, {})", hex(rgb), turns * 360));
        prop_assert_eq!(spun.to_rgba8(), (rgb.0, rgb.1, rgb.2, 255));
    }

    /// A zero adjustment is the identity at 8-bit precision.
    #[test]
    fn zero_darken_is_identity(rgb in color_strategy()) {
        let same = resolve_color(&format!("darken({}, 0%)", hex(rgb)));
        prop_assert_eq!(same.to_hex(), hex(rgb));
    }

    /// Row width follows `columns * width + gutter * (columns - 1)`.
    #[test]
    fn grid_row_width(columns in 1u32..=24, width in 1u32..=200, gutter in 0u32..=60) {
        let columns_text = columns.to_string();
        let width_text = format!("{}px", width);
        let gutter_text = format!("{}px", gutter);
        let defs = TokenDefinition::sequence([
            ("columns", columns_text.as_str()),
            ("width", width_text.as_str()),
            ("gutter", gutter_text.as_str()),
            ("row", "(@columns * @width) + (@gutter * (@columns - 1))"),
        ]);

        let table = resolve(&defs).unwrap();
        let expected = (columns * width + gutter * (columns - 1)) as f64;
        prop_assert_eq!(table.length("row").unwrap(), Length::px(expected));
    }
}
