//! A [`Surface`] that lands on terminal cells.
//!
//! Draw calls are recorded on a logical glyph grid. [`TerminalSurface::project`]
//! then fits that canvas into a block of terminal cells (letterboxed, centered)
//! and nearest-resamples the glyphs onto it.

use crate::ascii::Rgb;
use crate::surface::Surface;

/// One terminal cell of a projected image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermCell {
    pub glyph: char,
    pub color: Rgb,
}

/// The glyph grid mapped onto terminal cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalImage {
    /// Offset of the image inside the area it was projected into
    pub x_offset: u16,
    pub y_offset: u16,
    pub width: u16,
    pub height: u16,
    pub background: Rgb,
    /// Row-major, `width * height` long
    pub cells: Vec<TermCell>,
}

impl TerminalImage {
    pub fn get(&self, x: u16, y: u16) -> Option<TermCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Records painted glyphs on a logical grid.
#[derive(Debug, Clone, Default)]
pub struct TerminalSurface {
    background: Rgb,
    cell_width: f32,
    cell_height: f32,
    /// Painted extent since the last clear
    columns: u16,
    rows: u16,
    /// Allocated grid size; kept across clears so steady-state frames do not reallocate
    stride: u16,
    capacity_rows: u16,
    /// Row-major over `stride * capacity_rows`; `None` is an empty cell
    grid: Vec<Option<TermCell>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical grid size currently painted.
    pub fn grid_size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Whether anything has been painted since the last clear.
    pub fn is_blank(&self) -> bool {
        self.grid.iter().all(Option::is_none)
    }

    pub fn glyph_at(&self, column: u16, row: u16) -> Option<TermCell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.grid[row as usize * self.stride as usize + column as usize]
    }

    /// Logical canvas size in pixels.
    pub fn canvas_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Fit the painted canvas into `area_columns x area_rows` terminal cells.
    ///
    /// `term_cell_px` is the pixel size of one terminal cell, used to keep the
    /// canvas aspect ratio. Returns an empty image when nothing fits.
    pub fn project(
        &self,
        area_columns: u16,
        area_rows: u16,
        term_cell_px: (f32, f32),
    ) -> TerminalImage {
        let (canvas_w, canvas_h) = self.canvas_size();
        let (term_w, term_h) = term_cell_px;
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if area_columns == 0
            || area_rows == 0
            || !usable(canvas_w)
            || !usable(canvas_h)
            || !usable(term_w)
            || !usable(term_h)
        {
            return TerminalImage {
                background: self.background,
                ..TerminalImage::default()
            };
        }

        let area_w = area_columns as f32 * term_w;
        let area_h = area_rows as f32 * term_h;
        let scale = (area_w / canvas_w).min(area_h / canvas_h);

        let width = ((canvas_w * scale / term_w).round() as u16).clamp(1, area_columns);
        let height = ((canvas_h * scale / term_h).round() as u16).clamp(1, area_rows);

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for ty in 0..height {
            let y = (ty as f32 + 0.5) / height as f32 * canvas_h;
            let row = ((y / self.cell_height) as u16).min(self.rows - 1);
            for tx in 0..width {
                let x = (tx as f32 + 0.5) / width as f32 * canvas_w;
                let column = ((x / self.cell_width) as u16).min(self.columns - 1);
                let cell = self.glyph_at(column, row).unwrap_or(TermCell {
                    glyph: ' ',
                    color: self.background,
                });
                cells.push(cell);
            }
        }

        TerminalImage {
            x_offset: (area_columns - width) / 2,
            y_offset: (area_rows - height) / 2,
            width,
            height,
            background: self.background,
            cells,
        }
    }

    fn ensure_cell(&mut self, column: u16, row: u16) {
        if column >= self.stride || row >= self.capacity_rows {
            let stride = self.stride.max(column.saturating_add(1));
            let capacity_rows = self.capacity_rows.max(row.saturating_add(1));
            let mut grid = vec![None; stride as usize * capacity_rows as usize];
            let old = self.stride as usize;
            for r in 0..self.capacity_rows as usize {
                grid[r * stride as usize..r * stride as usize + old]
                    .copy_from_slice(&self.grid[r * old..(r + 1) * old]);
            }
            self.stride = stride;
            self.capacity_rows = capacity_rows;
            self.grid = grid;
        }
        self.columns = self.columns.max(column + 1);
        self.rows = self.rows.max(row + 1);
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self, color: Rgb) {
        self.background = color;
        self.columns = 0;
        self.rows = 0;
        self.grid.fill(None);
    }

    fn set_font(&mut self, cell_width: f32, cell_height: f32) {
        self.cell_width = cell_width;
        self.cell_height = cell_height;
    }

    fn fill_text(&mut self, x: f32, y: f32, glyph: char, color: Rgb) {
        if !(self.cell_width > 0.0 && self.cell_height > 0.0) || x < 0.0 || y < 0.0 {
            return;
        }
        let column = (x / self.cell_width).round();
        let row = (y / self.cell_height).round();
        if !(column.is_finite() && row.is_finite())
            || column >= u16::MAX as f32
            || row >= u16::MAX as f32
        {
            return;
        }
        let (column, row) = (column as u16, row as u16);
        self.ensure_cell(column, row);
        let idx = row as usize * self.stride as usize + column as usize;
        self.grid[idx] = Some(TermCell { glyph, color });
    }
}
