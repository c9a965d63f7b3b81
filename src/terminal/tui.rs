//! Owner of the terminal for the length of a session.
//!
//! Raw mode, the alternate screen and the hidden cursor are switched on in
//! [`Tui::new`] and off again in [`Tui::restore`] or on drop. Drawing is
//! delegated to the `rendering` module.

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::atomic::Ordering;

use super::raw_mode::{install_panic_hook, RAW_MODE_ACTIVE};
use super::rendering::{self, View};

/// Full-screen ratatui terminal over crossterm.
///
/// The terminal is handed back even if the app panics (see
/// [`super::emergency_restore`]).
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Cleared once the terminal has been handed back
    active: bool,
}

impl Tui {
    /// Take over the terminal.
    ///
    /// # Errors
    /// Fails when stdout is not a TTY or the terminal rejects raw mode.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        if let Err(e) = crossterm::execute!(stdout, EnterAlternateScreen, Hide) {
            super::emergency_restore();
            return Err(e);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                super::emergency_restore();
                return Err(e);
            }
        };
        log::debug!("Terminal taken over");

        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Hand the terminal back. Later calls (and drop) do nothing.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);

        crossterm::execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        log::debug!("Terminal restored");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Draw one full frame: ASCII canvas, modal, status bar.
    pub fn draw(&mut self, view: &View<'_>) -> io::Result<()> {
        self.terminal.draw(|frame| rendering::render_view(frame, view))?;
        Ok(())
    }

    /// Current terminal size in cells.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}
