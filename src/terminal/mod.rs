//! Terminal management module - raw mode, TUI wrapper, the terminal surface,
//! overlay types, and cleanup.

mod modal;
mod raw_mode;
mod rendering;
mod status_bar;
mod surface;
mod tui;

pub use modal::{PermissionModal, ACCESS_NOTICE};
pub use raw_mode::{emergency_restore, raw_mode_active};
pub use rendering::{render_view, split_area, AsciiCanvas, View};
pub use status_bar::{StatusBar, StatusInfo};
pub use surface::{TermCell, TerminalImage, TerminalSurface};
pub use tui::Tui;

/// Pixel size of one terminal cell.
///
/// Uses the size the terminal reports; terminals that report no pixel size
/// get `fallback`.
pub fn cell_pixel_size(fallback: (f32, f32)) -> (f32, f32) {
    match crossterm::terminal::window_size() {
        Ok(ws) if ws.width > 0 && ws.height > 0 && ws.columns > 0 && ws.rows > 0 => (
            ws.width as f32 / ws.columns as f32,
            ws.height as f32 / ws.rows as f32,
        ),
        _ => fallback,
    }
}
