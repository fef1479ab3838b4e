//! CSS hex color parsing.

/// An opaque RGB color with an optional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgb {
    /// Black, used when a color cannot be parsed.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Opaque color from channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)?;
                    *slot = u8::try_from(v * 17).ok()?;
                }
                Some(Self::new(out[0], out[1], out[2]))
            }
            6 | 8 => {
                let mut color = Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                );
                if hex.len() == 8 {
                    color.a = channel(&hex[6..8])?;
                }
                Some(color)
            }
            _ => None,
        }
    }

    /// Parse a hex color, falling back to `fallback` for anything else.
    #[must_use]
    pub fn parse_or(input: &str, fallback: Self) -> Self {
        Self::parse_hex(input).unwrap_or(fallback)
    }

    /// Channels as fractions in `0.0..=1.0`.
    #[must_use]
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// `#rrggbb` without alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Rgb::parse_hex("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse_hex("#FF6384"), Some(Rgb::new(255, 99, 132)));

        let translucent = Rgb::parse_hex("#36A2EB33").expect("8-digit hex");
        assert_eq!(translucent.a, 0x33);
        assert_eq!(translucent.to_hex(), "#36a2eb");
    }

    #[test]
    fn test_rejects_non_hex() {
        assert_eq!(Rgb::parse_hex("red"), None);
        assert_eq!(Rgb::parse_hex("#12"), None);
        assert_eq!(Rgb::parse_hex("#zzzzzz"), None);
        assert_eq!(Rgb::parse_or("rgba(1,2,3,1)", Rgb::BLACK), Rgb::BLACK);
    }
}
