//! Drawing surfaces the renderer paints onto.
//!
//! A [`Surface`] is an immediate-mode raster canvas in logical pixels: clear,
//! set a font size, draw a glyph at a position. Two implementations exist:
//! [`RasterSurface`] (an RGBA backing store used for export and readback) and
//! the terminal surface in [`crate::terminal`].

mod glyphs;
mod raster;

pub use glyphs::{block_coverage, embedded_font, GlyphBitmap, GlyphCache};
pub use raster::RasterSurface;

use crate::ascii::Rgb;

/// Minimal 2D canvas contract used by [`crate::ascii::paint`].
pub trait Surface {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgb);

    /// Set the glyph cell size in logical pixels for subsequent `fill_text` calls.
    fn set_font(&mut self, cell_width: f32, cell_height: f32);

    /// Draw `glyph` with its cell's top-left corner at logical `(x, y)`.
    fn fill_text(&mut self, x: f32, y: f32, glyph: char, color: Rgb);
}
