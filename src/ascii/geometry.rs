//! Grid geometry: how many character cells fit, how large they are, and how
//! large the output canvas is for a given container.

/// Default cell width/height ratio for common monospace fonts.
///
/// Glyph cells are roughly twice as tall as they are wide, so a square patch
/// of the source frame needs half as many rows as columns.
pub const DEFAULT_CELL_ASPECT: f32 = 0.5;

/// Default number of character columns.
pub const DEFAULT_COLUMNS: u16 = 120;

/// Raised when the container or the source frame has no usable size yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("geometry not ready: container or source frame has no size yet")]
pub struct GeometryUnready;

/// Character grid layout and canvas dimensions.
///
/// Logical sizes are in container (CSS-like) pixels; the backing store is
/// scaled by the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: u16,
    pub rows: u16,
    pub cell_width_px: f32,
    pub cell_height_px: f32,
    pub canvas_width_px: f32,
    pub canvas_height_px: f32,
    pub backing_width_px: u32,
    pub backing_height_px: u32,
    pub device_pixel_ratio: f32,
}

impl GridGeometry {
    /// Compute the layout for a container and a source frame.
    ///
    /// # Arguments
    /// * `container_width_px` / `container_height_px` - available space
    /// * `frame_aspect` - source frame width / height
    /// * `device_pixel_ratio` - physical pixels per logical pixel (values below 1 count as 1)
    /// * `target_columns` - fixed number of character columns
    /// * `cell_aspect` - glyph cell width / height
    ///
    /// # Errors
    /// [`GeometryUnready`] when the container has not been laid out, the frame
    /// size is unknown, or the grid parameters are degenerate.
    pub fn recompute(
        container_width_px: f32,
        container_height_px: f32,
        frame_aspect: f32,
        device_pixel_ratio: f32,
        target_columns: u16,
        cell_aspect: f32,
    ) -> Result<Self, GeometryUnready> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(container_width_px)
            || !positive(container_height_px)
            || !positive(frame_aspect)
            || !positive(cell_aspect)
            || target_columns == 0
        {
            return Err(GeometryUnready);
        }

        // Fit to width first, shrink to height if that overflows.
        let mut canvas_width = container_width_px;
        let mut canvas_height = container_width_px / frame_aspect;
        if canvas_height > container_height_px {
            canvas_height = container_height_px;
            canvas_width = container_height_px * frame_aspect;
        }

        let rows = (target_columns as f32 * cell_aspect / frame_aspect)
            .floor()
            .clamp(1.0, u16::MAX as f32) as u16;

        let cell_width = canvas_width / target_columns as f32;
        let cell_height = cell_width / cell_aspect;

        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio >= 1.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        Ok(Self {
            columns: target_columns,
            rows,
            cell_width_px: cell_width,
            cell_height_px: cell_height,
            canvas_width_px: canvas_width,
            canvas_height_px: canvas_height,
            backing_width_px: ((canvas_width * dpr).round() as u32).max(1),
            backing_height_px: ((canvas_height * dpr).round() as u32).max(1),
            device_pixel_ratio: dpr,
        })
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Canvas width / height.
    pub fn canvas_aspect(&self) -> f32 {
        self.canvas_width_px / self.canvas_height_px
    }

    /// Logical top-left corner of a cell.
    pub fn cell_origin(&self, column: u16, row: u16) -> (f32, f32) {
        (
            column as f32 * self.cell_width_px,
            row as f32 * self.cell_height_px,
        )
    }
}
