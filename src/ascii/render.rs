//! Turning a sample grid into glyph draw commands, and issuing them to a surface.
//!
//! [`AsciiRenderer::render`] is pure: it produces a [`DrawList`] without
//! touching any drawing API. [`paint`] is the thin adapter that replays a
//! draw list onto a [`Surface`].

use super::color::Rgb;
use super::geometry::GridGeometry;
use super::ramp::GlyphRamp;
use super::sampler::SampleGrid;
use crate::surface::Surface;

/// One glyph to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub column: u16,
    pub row: u16,
    /// Logical x of the cell's left edge
    pub x: f32,
    /// Logical y of the cell's top edge (glyphs are top-aligned)
    pub y: f32,
    pub glyph: char,
    pub color: Rgb,
}

/// Everything needed to repaint the output surface for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub columns: u16,
    pub rows: u16,
    pub cell_width_px: f32,
    pub cell_height_px: f32,
    pub background: Rgb,
    /// Row-major, one per cell
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn command_at(&self, column: u16, row: u16) -> Option<&DrawCommand> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.commands
            .get(row as usize * self.columns as usize + column as usize)
    }

    /// Glyphs only, one line per row.
    pub fn to_text(&self) -> String {
        if self.columns == 0 {
            return String::new();
        }
        self.commands
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|c| c.glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Color policy and palette for glyph rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiRenderer {
    /// Fill color for every glyph in monochrome mode
    pub accent: Rgb,
    /// Color the surface is cleared to before each frame
    pub background: Rgb,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self {
            accent: Rgb::ACCENT,
            background: Rgb::BACKGROUND,
        }
    }
}

impl AsciiRenderer {
    pub fn new(accent: Rgb, background: Rgb) -> Self {
        Self { accent, background }
    }

    /// Build the draw list for one frame.
    pub fn render(
        &self,
        grid: &SampleGrid,
        geometry: &GridGeometry,
        ramp: &GlyphRamp,
        color_mode: bool,
    ) -> DrawList {
        let mut list = DrawList::default();
        self.render_into(grid, geometry, ramp, color_mode, &mut list);
        list
    }

    /// Build the draw list for one frame into `list`, reusing its allocation.
    ///
    /// Cells are visited in row-major order. Only cells present in both the
    /// grid and the geometry are drawn.
    pub fn render_into(
        &self,
        grid: &SampleGrid,
        geometry: &GridGeometry,
        ramp: &GlyphRamp,
        color_mode: bool,
        list: &mut DrawList,
    ) {
        let columns = grid.columns.min(geometry.columns);
        let rows = grid.rows.min(geometry.rows);

        list.columns = columns;
        list.rows = rows;
        list.cell_width_px = geometry.cell_width_px;
        list.cell_height_px = geometry.cell_height_px;
        list.background = self.background;
        list.commands.clear();
        list.commands.reserve(columns as usize * rows as usize);

        let accent = self.accent;
        for row in 0..rows {
            let y = row as f32 * geometry.cell_height_px;
            let line = grid
                .cells
                .get(row as usize * grid.columns as usize..)
                .unwrap_or(&[]);
            for (column, sample) in line.iter().take(columns as usize).enumerate() {
                let column = column as u16;
                list.commands.push(DrawCommand {
                    column,
                    row,
                    x: column as f32 * geometry.cell_width_px,
                    y,
                    glyph: ramp.glyph_for(sample.luminance()),
                    color: if color_mode { (*sample).into() } else { accent },
                });
            }
        }
    }
}

/// Repaint `surface` with `list`: clear to the background, then draw every glyph.
pub fn paint<S: Surface + ?Sized>(list: &DrawList, surface: &mut S) {
    surface.clear(list.background);
    surface.set_font(list.cell_width_px, list.cell_height_px);
    for cmd in &list.commands {
        surface.fill_text(cmd.x, cmd.y, cmd.glyph, cmd.color);
    }
}
