//! Colors used by the renderer and the surfaces.

use std::fmt;
use std::str::FromStr;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Vivid green used for every glyph in monochrome mode.
    pub const ACCENT: Rgb = Rgb::new(0x00, 0xff, 0xbf);

    /// Near-black canvas background.
    pub const BACKGROUND: Rgb = Rgb::new(0x05, 0x05, 0x05);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`, saturating at 255.
    ///
    /// Used for the snapshot flash (`factor = 2.0` is a 200% brightness filter).
    pub fn brightened(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// RGBA bytes with full opacity.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a `#rrggbb` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ParseColorError(pub String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!("#00ffbf".parse::<Rgb>().unwrap(), Rgb::ACCENT);
        assert_eq!("050505".parse::<Rgb>().unwrap(), Rgb::BACKGROUND);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#00ff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let c = Rgb::new(18, 52, 86);
        assert_eq!(c.to_string(), "#123456");
        assert_eq!(c.to_string().parse::<Rgb>().unwrap(), c);
    }

    #[test]
    fn test_brightened_saturates() {
        let c = Rgb::new(100, 200, 0).brightened(2.0);
        assert_eq!(c, Rgb::new(200, 255, 0));
    }
}
