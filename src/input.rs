//! Keyboard input handling.
//!
//! Maps crossterm key events to UI actions:
//! - `Enter` / `s`: start the camera
//! - `c`: toggle color mode
//! - `r`: next preset character set
//! - `p` / `Space`: save a snapshot
//! - `q` / `Esc` / `Ctrl+C`: quit

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Start,
    ToggleColor,
    CycleCharset,
    Snapshot,
    Quit,
    None,
}

/// Map a key event to an action. Key releases are ignored.
pub fn handle_key_event(event: KeyEvent) -> UiAction {
    if event.kind == KeyEventKind::Release {
        return UiAction::None;
    }

    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => UiAction::Quit,
            _ => UiAction::None,
        };
    }
    if modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) {
        return UiAction::None;
    }

    match code {
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => UiAction::Start,
        KeyCode::Char('c') | KeyCode::Char('C') => UiAction::ToggleColor,
        KeyCode::Char('r') | KeyCode::Char('R') => UiAction::CycleCharset,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => UiAction::Snapshot,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => UiAction::Quit,
        _ => UiAction::None,
    }
}
