//! Glyph ramps: characters ordered from darkest to lightest.

use std::fmt;
use std::str::FromStr;

/// Standard ASCII density ramp (10 levels), space (dark) to `@` (light).
pub const STANDARD_RAMP: &str = " .:-=+*#%@";

/// Unicode shade blocks (5 levels).
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Minimal 4-level ramp for a clean look.
pub const MINIMAL_RAMP: &str = " .:#";

/// Longer 15-level ramp with more tonal steps.
pub const DENSE_RAMP: &str = " .,:-=o+*#%&@8$";

/// Errors raised when building a ramp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RampError {
    #[error("glyph ramp needs at least 2 characters, got {0}")]
    TooShort(usize),
}

/// An immutable, ordered glyph ramp and its luminance quantizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from characters ordered dark to light.
    pub fn new(glyphs: impl IntoIterator<Item = char>) -> Result<Self, RampError> {
        let glyphs: Vec<char> = glyphs.into_iter().collect();
        if glyphs.len() < 2 {
            return Err(RampError::TooShort(glyphs.len()));
        }
        Ok(Self { glyphs })
    }

    /// Number of glyphs in the ramp.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; a ramp holds at least two glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Ramp index for a normalized luminance.
    ///
    /// `floor(luminance * (len - 1))`, clamped so that luminance outside
    /// `[0, 1]` (or exactly 1.0 after rounding noise) never escapes the ramp.
    /// NaN maps to the darkest glyph.
    #[inline]
    pub fn index_for(&self, luminance: f32) -> usize {
        let max_index = self.glyphs.len() - 1;
        let l = if luminance.is_nan() {
            0.0
        } else {
            luminance.clamp(0.0, 1.0)
        };
        ((l * max_index as f32).floor() as usize).min(max_index)
    }

    /// Glyph for a normalized luminance in `[0, 1]`.
    #[inline]
    pub fn glyph_for(&self, luminance: f32) -> char {
        self.glyphs[self.index_for(luminance)]
    }

    pub fn darkest(&self) -> char {
        self.glyphs[0]
    }

    pub fn lightest(&self) -> char {
        self.glyphs[self.glyphs.len() - 1]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        CharSet::Standard.ramp()
    }
}

impl fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.glyphs.iter().try_for_each(|c| write!(f, "{}", c))
    }
}

/// Built-in ramp presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
    Dense,
}

impl CharSet {
    pub fn chars(&self) -> &'static str {
        match self {
            CharSet::Standard => STANDARD_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
            CharSet::Minimal => MINIMAL_RAMP,
            CharSet::Dense => DENSE_RAMP,
        }
    }

    /// The preset as a ramp. Presets are always longer than two glyphs.
    pub fn ramp(&self) -> GlyphRamp {
        GlyphRamp {
            glyphs: self.chars().chars().collect(),
        }
    }

    /// Cycle to the next preset.
    ///
    /// Order: Standard -> Blocks -> Minimal -> Dense -> Standard
    pub fn next(&self) -> Self {
        match self {
            CharSet::Standard => CharSet::Blocks,
            CharSet::Blocks => CharSet::Minimal,
            CharSet::Minimal => CharSet::Dense,
            CharSet::Dense => CharSet::Standard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
            CharSet::Dense => "dense",
        }
    }
}

impl FromStr for CharSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(CharSet::Standard),
            "blocks" => Ok(CharSet::Blocks),
            "minimal" => Ok(CharSet::Minimal),
            "dense" => Ok(CharSet::Dense),
            other => Err(format!("unknown charset '{}'", other)),
        }
    }
}
