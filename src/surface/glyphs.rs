//! Glyph rasterizing for [`super::RasterSurface`].
//!
//! Glyphs come from an embedded DejaVu Sans Mono, rasterized with fontdue at
//! the largest size whose advance and line height fit the cell. Bitmaps are
//! cached per character for the current cell size. Shade and block characters
//! bypass the font and cover their whole cell so neighbouring cells join.

use std::collections::HashMap;
use std::sync::OnceLock;

use fontdue::{Font, FontSettings};

static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Size the font is measured at before scaling to a cell.
const REFERENCE_PX: f32 = 64.0;

/// The embedded monospace font, parsed on first use.
///
/// `None` only if the bundled font fails to parse; glyphs then draw nothing.
pub fn embedded_font() -> Option<&'static Font> {
    static FONT: OnceLock<Option<Font>> = OnceLock::new();
    FONT.get_or_init(|| match Font::from_bytes(FONT_BYTES, FontSettings::default()) {
        Ok(font) => Some(font),
        Err(e) => {
            log::error!("Failed to parse embedded font: {}", e);
            None
        }
    })
    .as_ref()
}

/// Coverage of a shade or block character, which fills its cell.
pub fn block_coverage(ch: char) -> Option<u8> {
    match ch {
        '░' => Some(64),
        '▒' => Some(128),
        '▓' => Some(192),
        '█' => Some(255),
        _ => None,
    }
}

/// A rasterized glyph placed relative to its cell's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub left: i32,
    pub top: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    fn empty() -> Self {
        Self {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }

    /// Coverage at glyph-local coordinates.
    pub fn coverage_at(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.coverage[y * self.width + x]
        } else {
            0
        }
    }
}

/// Font size and baseline that fit one cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellFit {
    px: f32,
    baseline: f32,
    pad_x: f32,
}

impl CellFit {
    fn new(font: &Font, cell_width: u32, cell_height: u32) -> Self {
        let advance = font.metrics('M', REFERENCE_PX).advance_width.max(1.0);
        let (ascent, descent) = font
            .horizontal_line_metrics(REFERENCE_PX)
            .map_or((REFERENCE_PX * 0.8, -REFERENCE_PX * 0.2), |m| {
                (m.ascent, m.descent)
            });
        let line_height = (ascent - descent).max(1.0);

        let px = (cell_width as f32 * REFERENCE_PX / advance)
            .min(cell_height as f32 * REFERENCE_PX / line_height);
        let k = px / REFERENCE_PX;
        Self {
            px,
            baseline: (cell_height as f32 - line_height * k) / 2.0 + ascent * k,
            pad_x: (cell_width as f32 - advance * k) / 2.0,
        }
    }
}

/// Glyph bitmaps for one cell size in backing pixels.
#[derive(Debug, Clone, Default)]
pub struct GlyphCache {
    cell: (u32, u32),
    fit: Option<CellFit>,
    glyphs: HashMap<char, GlyphBitmap>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new cell size. Cached bitmaps are dropped only when it changes.
    pub fn set_cell(&mut self, cell_width: u32, cell_height: u32) {
        if self.cell == (cell_width, cell_height) {
            return;
        }
        self.cell = (cell_width, cell_height);
        self.fit = None;
        self.glyphs.clear();
    }

    pub fn cell(&self) -> (u32, u32) {
        self.cell
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Bitmap for `ch` at the current cell size.
    pub fn glyph(&mut self, ch: char) -> &GlyphBitmap {
        let (cell_width, cell_height) = self.cell;
        let fit = &mut self.fit;
        self.glyphs.entry(ch).or_insert_with(|| {
            let Some(font) = embedded_font() else {
                return GlyphBitmap::empty();
            };
            if cell_width == 0 || cell_height == 0 {
                return GlyphBitmap::empty();
            }
            let fit = *fit.get_or_insert_with(|| CellFit::new(font, cell_width, cell_height));
            let (metrics, coverage) = font.rasterize(ch, fit.px);
            GlyphBitmap {
                left: (fit.pad_x + metrics.xmin as f32).round() as i32,
                top: (fit.baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32,
                width: metrics.width,
                height: metrics.height,
                coverage,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(bitmap: &GlyphBitmap) -> usize {
        bitmap.coverage.iter().filter(|&&c| c > 0).count()
    }

    #[test]
    fn test_embedded_font_parses() {
        let font = embedded_font().unwrap();
        for ch in "Ñ@#W$9876543210?!abc;:+=-,._".chars() {
            assert_ne!(font.lookup_glyph_index(ch), 0, "missing {:?}", ch);
        }
    }

    #[test]
    fn test_block_coverage() {
        assert_eq!(block_coverage('█'), Some(255));
        assert_eq!(block_coverage('░'), Some(64));
        assert_eq!(block_coverage('#'), None);
    }

    #[test]
    fn test_glyphs_fit_inside_cell() {
        let mut cache = GlyphCache::new();
        cache.set_cell(12, 24);
        for ch in "@#Wgjy_|".chars() {
            let g = cache.glyph(ch);
            assert!(g.left >= -1 && g.top >= -1, "{:?} at {},{}", ch, g.left, g.top);
            assert!(g.left + g.width as i32 <= 13, "{:?} too wide", ch);
            assert!(g.top + g.height as i32 <= 25, "{:?} too tall", ch);
        }
    }

    #[test]
    fn test_distinct_letters_get_distinct_bitmaps() {
        let mut cache = GlyphCache::new();
        cache.set_cell(12, 24);
        let a = cache.glyph('a').clone();
        let b = cache.glyph('b').clone();
        assert!(lit(&a) > 0);
        assert!(lit(&b) > 0);
        assert_ne!(a, b);
        // 'b' has an ascender, 'a' does not
        assert!(b.top < a.top);
    }

    #[test]
    fn test_space_has_no_coverage() {
        let mut cache = GlyphCache::new();
        cache.set_cell(12, 24);
        assert_eq!(lit(cache.glyph(' ')), 0);
    }

    #[test]
    fn test_cache_resets_on_cell_change() {
        let mut cache = GlyphCache::new();
        cache.set_cell(8, 16);
        cache.glyph('@');
        cache.glyph('.');
        assert_eq!(cache.len(), 2);

        cache.set_cell(8, 16);
        assert_eq!(cache.len(), 2);

        cache.set_cell(16, 32);
        assert!(cache.is_empty());
        let big = lit(cache.glyph('@'));
        cache.set_cell(8, 16);
        let small = lit(cache.glyph('@'));
        assert!(big > small);
    }

    #[test]
    fn test_zero_cell_draws_nothing() {
        let mut cache = GlyphCache::new();
        cache.set_cell(0, 16);
        assert_eq!(cache.glyph('@').width, 0);
    }
}
