//! Downsampling a camera frame to one RGB sample per character cell.

use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb as ImageRgb};

use super::color::Rgb;
use crate::camera::Frame;

/// RGB sample for one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl CellSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mean of the three channels, normalized to `[0, 1]`.
    #[inline]
    pub fn luminance(&self) -> f32 {
        (self.r as u32 + self.g as u32 + self.b as u32) as f32 / 3.0 / 255.0
    }
}

impl From<CellSample> for Rgb {
    fn from(s: CellSample) -> Self {
        Rgb::new(s.r, s.g, s.b)
    }
}

/// Resampling method used to shrink the frame to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFilter {
    /// Average of every pixel covered by the cell.
    #[default]
    Box,
    /// The pixel under the cell center.
    Nearest,
    /// Triangle-filtered resize from the `image` crate.
    Bilinear,
}

impl SampleFilter {
    pub fn name(&self) -> &'static str {
        match self {
            SampleFilter::Box => "box",
            SampleFilter::Nearest => "nearest",
            SampleFilter::Bilinear => "bilinear",
        }
    }
}

impl FromStr for SampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "box" | "area" => Ok(SampleFilter::Box),
            "nearest" => Ok(SampleFilter::Nearest),
            "bilinear" | "triangle" => Ok(SampleFilter::Bilinear),
            other => Err(format!("unknown sampling filter '{}'", other)),
        }
    }
}

/// Row-major grid of samples, `columns * rows` long.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleGrid {
    pub columns: u16,
    pub rows: u16,
    pub cells: Vec<CellSample>,
}

impl SampleGrid {
    /// A grid filled with one sample.
    pub fn filled(columns: u16, rows: u16, sample: CellSample) -> Self {
        Self {
            columns,
            rows,
            cells: vec![sample; columns as usize * rows as usize],
        }
    }

    pub fn get(&self, column: u16, row: u16) -> Option<CellSample> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.columns as usize + column as usize)
            .copied()
    }

    pub fn set(&mut self, column: u16, row: u16, sample: CellSample) {
        if column < self.columns && row < self.rows {
            let idx = row as usize * self.columns as usize + column as usize;
            self.cells[idx] = sample;
        }
    }
}

/// Produces a fresh [`SampleGrid`] per frame, reusing its buffer.
#[derive(Debug, Default)]
pub struct FrameSampler {
    filter: SampleFilter,
    grid: SampleGrid,
}

impl FrameSampler {
    pub fn new(filter: SampleFilter) -> Self {
        Self {
            filter,
            grid: SampleGrid::default(),
        }
    }

    pub fn filter(&self) -> SampleFilter {
        self.filter
    }

    /// Downsample `frame` to exactly `columns x rows` samples.
    ///
    /// The returned grid is fully overwritten on every call. Returns `None`
    /// for a zero-sized grid or a frame without a size or with fewer bytes
    /// than its dimensions require.
    pub fn sample(&mut self, frame: &Frame, columns: u16, rows: u16) -> Option<&SampleGrid> {
        if columns == 0 || rows == 0 || !frame.is_complete() {
            return None;
        }

        self.grid.columns = columns;
        self.grid.rows = rows;
        self.grid.cells.clear();
        self.grid.cells.reserve(columns as usize * rows as usize);

        match self.filter {
            SampleFilter::Box => box_average_into(frame, columns, rows, &mut self.grid.cells),
            SampleFilter::Nearest => nearest_into(frame, columns, rows, &mut self.grid.cells),
            SampleFilter::Bilinear => bilinear_into(frame, columns, rows, &mut self.grid.cells)?,
        }

        Some(&self.grid)
    }
}

#[inline]
fn pixel_at(frame: &Frame, x: u32, y: u32) -> CellSample {
    let idx = (y as usize * frame.width as usize + x as usize) * 3;
    CellSample::new(frame.data[idx], frame.data[idx + 1], frame.data[idx + 2])
}

/// Average every pixel in each cell's footprint. Cells narrower than one
/// pixel fall back to the pixel they start in.
fn box_average_into(frame: &Frame, columns: u16, rows: u16, out: &mut Vec<CellSample>) {
    let cell_w = frame.width as f32 / columns as f32;
    let cell_h = frame.height as f32 / rows as f32;

    for cy in 0..rows as u32 {
        let start_y = ((cy as f32 * cell_h) as u32).min(frame.height - 1);
        let end_y = (((cy + 1) as f32 * cell_h) as u32).clamp(start_y + 1, frame.height);
        for cx in 0..columns as u32 {
            let start_x = ((cx as f32 * cell_w) as u32).min(frame.width - 1);
            let end_x = (((cx + 1) as f32 * cell_w) as u32).clamp(start_x + 1, frame.width);

            let (mut sum_r, mut sum_g, mut sum_b) = (0u64, 0u64, 0u64);
            for py in start_y..end_y {
                for px in start_x..end_x {
                    let p = pixel_at(frame, px, py);
                    sum_r += p.r as u64;
                    sum_g += p.g as u64;
                    sum_b += p.b as u64;
                }
            }
            let count = ((end_x - start_x) * (end_y - start_y)) as u64;
            out.push(CellSample::new(
                (sum_r / count) as u8,
                (sum_g / count) as u8,
                (sum_b / count) as u8,
            ));
        }
    }
}

fn nearest_into(frame: &Frame, columns: u16, rows: u16, out: &mut Vec<CellSample>) {
    let cell_w = frame.width as f32 / columns as f32;
    let cell_h = frame.height as f32 / rows as f32;

    for cy in 0..rows as u32 {
        let py = (((cy as f32 + 0.5) * cell_h) as u32).min(frame.height - 1);
        for cx in 0..columns as u32 {
            let px = (((cx as f32 + 0.5) * cell_w) as u32).min(frame.width - 1);
            out.push(pixel_at(frame, px, py));
        }
    }
}

fn bilinear_into(frame: &Frame, columns: u16, rows: u16, out: &mut Vec<CellSample>) -> Option<()> {
    let pixel_bytes = frame.width as usize * frame.height as usize * 3;
    let source: ImageBuffer<ImageRgb<u8>, &[u8]> =
        ImageBuffer::from_raw(frame.width, frame.height, &frame.data[..pixel_bytes])?;
    let resized = imageops::resize(&source, columns as u32, rows as u32, FilterType::Triangle);
    out.extend(
        resized
            .pixels()
            .map(|p| CellSample::new(p.0[0], p.0[1], p.0[2])),
    );
    Some(())
}
