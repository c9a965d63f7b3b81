//! Off-screen RGBA surface backed by an `image::RgbaImage`.

use std::io::Cursor;

use image::{imageops, ImageFormat, ImageResult, Rgba, RgbaImage};

use super::glyphs::{block_coverage, GlyphCache};
use super::Surface;
use crate::ascii::{GridGeometry, Rgb};

/// Raster canvas whose pixel size is the logical size times the device pixel ratio.
///
/// All drawing calls take logical coordinates; the surface applies the scale.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    scale: f32,
    cell_width: f32,
    cell_height: f32,
    glyphs: GlyphCache,
}

impl RasterSurface {
    /// Create a surface with an explicit backing size and scale.
    pub fn new(backing_width: u32, backing_height: u32, device_pixel_ratio: f32) -> Self {
        let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            image: RgbaImage::new(backing_width.max(1), backing_height.max(1)),
            scale,
            cell_width: 0.0,
            cell_height: 0.0,
            glyphs: GlyphCache::new(),
        }
    }

    /// Create a surface sized to a grid's backing store.
    pub fn for_geometry(geometry: &GridGeometry) -> Self {
        Self::new(
            geometry.backing_width_px,
            geometry.backing_height_px,
            geometry.device_pixel_ratio,
        )
    }

    /// Resize the backing store, discarding its contents.
    pub fn resize(&mut self, geometry: &GridGeometry) {
        let (w, h) = (
            geometry.backing_width_px.max(1),
            geometry.backing_height_px.max(1),
        );
        if self.image.dimensions() != (w, h) {
            self.image = RgbaImage::new(w, h);
        }
        self.scale = geometry.device_pixel_ratio.max(1.0);
        self.sync_glyph_cell();
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Pixel at backing coordinates, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
    }

    /// Copy out a rectangle in backing pixels. `None` if it leaves the surface.
    pub fn read_region(&self, x: u32, y: u32, width: u32, height: u32) -> Option<RgbaImage> {
        let fits = |start: u32, len: u32, max: u32| {
            len > 0 && start.checked_add(len).map_or(false, |end| end <= max)
        };
        if !fits(x, width, self.image.width()) || !fits(y, height, self.image.height()) {
            return None;
        }
        Some(imageops::crop_imm(&self.image, x, y, width, height).to_image())
    }

    /// Encode the whole backing store as PNG bytes.
    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Cell size in backing pixels for the glyph cache.
    fn sync_glyph_cell(&mut self) {
        let px = |len: f32| (len * self.scale).round().max(0.0) as u32;
        let (w, h) = (px(self.cell_width), px(self.cell_height));
        self.glyphs.set_cell(w, h);
    }

    /// Logical span `[start, start + len)` to an unclipped backing pixel range.
    fn to_backing(&self, start: f32, len: f32) -> (i64, i64) {
        (
            (start * self.scale).round() as i64,
            ((start + len) * self.scale).round() as i64,
        )
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self, color: Rgb) {
        let px = Rgba(color.to_rgba());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    fn set_font(&mut self, cell_width: f32, cell_height: f32) {
        self.cell_width = cell_width.max(0.0);
        self.cell_height = cell_height.max(0.0);
        self.sync_glyph_cell();
    }

    fn fill_text(&mut self, x: f32, y: f32, glyph: char, color: Rgb) {
        if glyph == ' ' {
            return;
        }
        let (x0, x1) = self.to_backing(x, self.cell_width);
        let (y0, y1) = self.to_backing(y, self.cell_height);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let clip = |lo: i64, hi: i64, max: u32| (lo.max(0), hi.min(max as i64));
        let (cx0, cx1) = clip(x0, x1, self.image.width());
        let (cy0, cy1) = clip(y0, y1, self.image.height());

        if let Some(coverage) = block_coverage(glyph) {
            for by in cy0..cy1 {
                for bx in cx0..cx1 {
                    blend(self.image.get_pixel_mut(bx as u32, by as u32), color, coverage);
                }
            }
            return;
        }

        let bitmap = self.glyphs.glyph(glyph);
        for gy in 0..bitmap.height {
            let by = y0 + bitmap.top as i64 + gy as i64;
            if by < cy0 || by >= cy1 {
                continue;
            }
            for gx in 0..bitmap.width {
                let bx = x0 + bitmap.left as i64 + gx as i64;
                if bx < cx0 || bx >= cx1 {
                    continue;
                }
                let coverage = bitmap.coverage_at(gx, gy);
                if coverage > 0 {
                    blend(self.image.get_pixel_mut(bx as u32, by as u32), color, coverage);
                }
            }
        }
    }
}

/// Composite `color` over `pixel` with `coverage` as alpha. The result is opaque.
fn blend(pixel: &mut Rgba<u8>, color: Rgb, coverage: u8) {
    let alpha = u16::from(coverage);
    let inv = 255 - alpha;
    let src = [color.r, color.g, color.b];
    for (dst, src) in pixel.0.iter_mut().zip(src) {
        *dst = ((u16::from(src) * alpha + u16::from(*dst) * inv + 127) / 255) as u8;
    }
    pixel.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut surface = RasterSurface::new(4, 3, 1.0);
        surface.clear(Rgb::BACKGROUND);
        assert!(surface
            .image()
            .pixels()
            .all(|p| p.0 == [5, 5, 5, 255]));
    }

    #[test]
    fn test_full_block_covers_cell() {
        let mut surface = RasterSurface::new(20, 20, 1.0);
        surface.clear(Rgb::BACKGROUND);
        surface.set_font(10.0, 20.0);
        surface.fill_text(10.0, 0.0, '█', RED);
        for y in 0..20 {
            assert_eq!(surface.pixel(9, y), Some(Rgb::BACKGROUND));
            assert_eq!(surface.pixel(10, y), Some(RED));
            assert_eq!(surface.pixel(19, y), Some(RED));
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut surface = RasterSurface::new(12, 16, 1.0);
        surface.clear(Rgb::BACKGROUND);
        surface.set_font(12.0, 16.0);
        surface.fill_text(0.0, 0.0, ' ', RED);
        assert!(surface.image().pixels().all(|p| p.0 == [5, 5, 5, 255]));
    }

    fn lit_pixels(surface: &RasterSurface) -> Vec<(u32, u32)> {
        surface
            .image()
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [5, 5, 5, 255])
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    fn draw_one(glyph: char) -> RasterSurface {
        let mut surface = RasterSurface::new(24, 48, 1.0);
        surface.clear(Rgb::BACKGROUND);
        surface.set_font(24.0, 48.0);
        surface.fill_text(0.0, 0.0, glyph, RED);
        surface
    }

    #[test]
    fn test_custom_ramp_letters_render_as_letters() {
        // letters from a custom ramp, not in any preset
        let box_outline = |lit: &[(u32, u32)]| {
            let (min_x, max_x) = (lit.iter().map(|p| p.0).min(), lit.iter().map(|p| p.0).max());
            let (min_y, max_y) = (lit.iter().map(|p| p.1).min(), lit.iter().map(|p| p.1).max());
            match (min_x, max_x, min_y, max_y) {
                (Some(x0), Some(x1), Some(y0), Some(y1)) => lit
                    .iter()
                    .all(|&(x, y)| x == x0 || x == x1 || y == y0 || y == y1),
                _ => false,
            }
        };
        let a = lit_pixels(&draw_one('a'));
        let b = lit_pixels(&draw_one('b'));
        assert!(!a.is_empty());
        assert!(!b.is_empty());
        assert_ne!(a, b);
        assert!(!box_outline(&a));
        assert!(!box_outline(&b));
    }

    #[test]
    fn test_glyph_stays_inside_its_cell() {
        let mut surface = RasterSurface::new(36, 48, 1.0);
        surface.clear(Rgb::BACKGROUND);
        surface.set_font(12.0, 24.0);
        surface.fill_text(12.0, 12.0, 'W', RED);
        let lit = lit_pixels(&surface);
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| (12..24).contains(&x) && (12..36).contains(&y)));
    }

    #[test]
    fn test_dense_glyph_covers_more_than_sparse() {
        assert!(lit_pixels(&draw_one('@')).len() > lit_pixels(&draw_one('.')).len());
    }

    #[test]
    fn test_shade_blends_with_background() {
        let mut surface = RasterSurface::new(4, 4, 1.0);
        surface.clear(Rgb::new(0, 0, 0));
        surface.set_font(4.0, 4.0);
        surface.fill_text(0.0, 0.0, '▒', Rgb::new(255, 255, 255));
        assert_eq!(surface.pixel(2, 2), Some(Rgb::new(128, 128, 128)));
    }

    #[test]
    fn test_device_pixel_ratio_scales_drawing() {
        let mut surface = RasterSurface::new(20, 40, 2.0);
        surface.clear(Rgb::BACKGROUND);
        surface.set_font(5.0, 10.0);
        surface.fill_text(5.0, 10.0, '█', RED);
        assert_eq!(surface.pixel(9, 19), Some(Rgb::BACKGROUND));
        assert_eq!(surface.pixel(10, 20), Some(RED));
        assert_eq!(surface.pixel(19, 39), Some(RED));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut surface = RasterSurface::new(8, 8, 1.0);
        surface.set_font(10.0, 10.0);
        surface.fill_text(4.0, 4.0, '█', RED);
        surface.fill_text(-20.0, -20.0, '█', RED);
        assert_eq!(surface.pixel(7, 7), Some(RED));
    }

    #[test]
    fn test_read_region() {
        let mut surface = RasterSurface::new(10, 10, 1.0);
        surface.clear(RED);
        let region = surface.read_region(2, 3, 4, 5).unwrap();
        assert_eq!(region.dimensions(), (4, 5));
        assert!(region.pixels().all(|p| p.0 == [255, 0, 0, 255]));
        assert!(surface.read_region(8, 0, 4, 1).is_none());
        assert!(surface.read_region(0, 0, 0, 1).is_none());
    }

    #[test]
    fn test_encode_png_signature() {
        let mut surface = RasterSurface::new(3, 2, 1.0);
        surface.clear(Rgb::ACCENT);
        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [0x00, 0xff, 0xbf, 0xff]);
    }

    #[test]
    fn test_for_geometry_uses_backing_size() {
        let geometry = GridGeometry::recompute(400.0, 300.0, 4.0 / 3.0, 2.0, 40, 0.5).unwrap();
        let surface = RasterSurface::for_geometry(&geometry);
        assert_eq!((surface.width(), surface.height()), (800, 600));
        assert_eq!(surface.scale(), 2.0);
    }
}
