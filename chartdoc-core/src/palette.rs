//! Default series colors.

/// Fixed palette used when a request does not supply its own colors.
pub const DEFAULT_PALETTE: [&str; 25] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8AC249", "#EA5F89",
    "#0D98BA", "#FFA07A", "#AF7AC5", "#FAD7A0", "#5D6D7E", "#DC7633", "#16A085", "#9FE2BF",
    "#F8C471", "#CB4335", "#85C1E9", "#F5B7B1", "#616A6B", "#AFBBDD", "#28B463", "#EB984E",
    "#7FB3D5",
];

/// Alpha suffix appended to line fills (`0x33` ≈ 20% opacity).
pub const FILL_ALPHA: &str = "33";

/// Color for series `index`. The palette wraps, so every index has a color.
#[must_use]
pub fn color_at(index: usize) -> &'static str {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// The first `count` palette colors, wrapping past the end of the palette.
#[must_use]
pub fn default_colors(count: usize) -> Vec<String> {
    (0..count).map(|i| color_at(i).to_string()).collect()
}

/// Append a two-digit hex alpha to a `#RRGGBB` color.
///
/// Colors in any other notation are returned unchanged.
#[must_use]
pub fn with_alpha(color: &str, alpha: &str) -> String {
    if color.len() == 7 && color.starts_with('#') {
        format!("{color}{alpha}")
    } else {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_colors_prefix() {
        let colors = default_colors(3);
        assert_eq!(colors, vec!["#FF6384", "#36A2EB", "#FFCE56"]);
        assert!(default_colors(0).is_empty());
    }

    #[test]
    fn test_palette_wraps_past_end() {
        let colors = default_colors(27);
        assert_eq!(colors.len(), 27);
        assert_eq!(colors[25], DEFAULT_PALETTE[0]);
        assert_eq!(colors[26], DEFAULT_PALETTE[1]);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#36A2EB", FILL_ALPHA), "#36A2EB33");
        assert_eq!(with_alpha("rgba(0,0,0,0.5)", FILL_ALPHA), "rgba(0,0,0,0.5)");
    }

    proptest! {
        #[test]
        fn prop_every_series_gets_a_palette_color(count in 0usize..200) {
            let colors = default_colors(count);
            prop_assert_eq!(colors.len(), count);
            for (i, c) in colors.iter().enumerate() {
                prop_assert_eq!(c.as_str(), DEFAULT_PALETTE[i % 25]);
            }
        }
    }
}
