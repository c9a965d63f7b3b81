//! Owned render state and the last known container.

/// What the render loop is doing and how it colors glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub running: bool,
    /// Per-cell color when true, the accent color when false
    pub color_mode: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            running: false,
            color_mode: true,
        }
    }
}

/// Size of the container the canvas must fit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width_px: f32, height_px: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width_px,
            height_px,
            device_pixel_ratio,
        }
    }

    /// Viewport for a block of terminal cells.
    pub fn from_cells(columns: u16, rows: u16, cell_px: (f32, f32)) -> Self {
        Self::new(columns as f32 * cell_px.0, rows as f32 * cell_px.1, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_stopped_with_color() {
        let state = RenderState::default();
        assert!(!state.running);
        assert!(state.color_mode);
    }

    #[test]
    fn test_viewport_from_cells() {
        let vp = Viewport::from_cells(100, 30, (8.0, 16.0));
        assert_eq!(vp, Viewport::new(800.0, 480.0, 1.0));
    }
}
