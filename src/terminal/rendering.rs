//! Rendering functions for terminal UI components.
//!
//! Pure rendering logic separated from terminal lifecycle management. All
//! functions operate on ratatui frames and buffers without managing terminal
//! state.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use super::surface::TerminalImage;
use super::{PermissionModal, StatusBar, StatusInfo};
use crate::ascii::Rgb;

/// Everything drawn in one terminal frame.
#[derive(Debug)]
pub struct View<'a> {
    /// Projected ASCII image, if anything has been painted
    pub image: Option<&'a TerminalImage>,
    pub background: Rgb,
    pub modal: &'a PermissionModal,
    pub status_bar: &'a StatusBar,
    pub status: &'a StatusInfo,
    /// Brightness multiplier while a snapshot flash is active
    pub flash: Option<f32>,
}

pub(crate) fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Widget that copies a projected image into the buffer.
pub struct AsciiCanvas<'a> {
    image: &'a TerminalImage,
    brightness: Option<f32>,
}

impl<'a> AsciiCanvas<'a> {
    pub fn new(image: &'a TerminalImage) -> Self {
        Self {
            image,
            brightness: None,
        }
    }

    pub fn brightness(mut self, factor: Option<f32>) -> Self {
        self.brightness = factor;
        self
    }
}

impl Widget for AsciiCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let shade = |c: Rgb| match self.brightness {
            Some(f) => c.brightened(f),
            None => c,
        };
        let bg = to_color(shade(self.image.background));

        for y in 0..self.image.height {
            let ty = area.y + self.image.y_offset + y;
            if ty >= area.bottom() {
                break;
            }
            for x in 0..self.image.width {
                let tx = area.x + self.image.x_offset + x;
                if tx >= area.right() {
                    break;
                }
                let Some(cell) = self.image.get(x, y) else {
                    continue;
                };
                if let Some(target) = buf.cell_mut((tx, ty)) {
                    target
                        .set_char(cell.glyph)
                        .set_fg(to_color(shade(cell.color)))
                        .set_bg(bg);
                }
            }
        }
    }
}

/// Split the screen into the canvas area and the status bar row.
pub fn split_area(area: Rect, status_bar: &StatusBar) -> (Rect, Rect) {
    let bar = status_bar.height().min(area.height);
    let main = Rect {
        height: area.height - bar,
        ..area
    };
    let status = Rect {
        y: area.y + area.height - bar,
        height: bar,
        ..area
    };
    (main, status)
}

/// Render the permission modal centered in `area`.
pub fn render_modal(frame: &mut ratatui::Frame, modal: &PermissionModal, area: Rect) {
    let rect = modal.calculate_rect(area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .title(" ascii-face ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(to_color(Rgb::ACCENT)));

    let lines: Vec<Line> = modal
        .lines()
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            // notice lines follow the blank line after the key hints
            if modal.notice.is_some() && i >= 4 {
                Line::styled(text, Style::default().fg(Color::LightRed))
            } else {
                Line::raw(text)
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::White).bg(Color::Black));
    frame.render_widget(paragraph, rect);
}

/// Render a status bar in its one-row area.
pub fn render_status_bar(
    frame: &mut ratatui::Frame,
    status_bar: &StatusBar,
    info: &StatusInfo,
    area: Rect,
) {
    if area.height == 0 {
        return;
    }
    let paragraph = Paragraph::new(status_bar.format(info))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(paragraph, area);
}

/// Render a complete frame with all layers.
///
/// 1. Background fill and ASCII canvas
/// 2. Permission modal (if visible)
/// 3. Status bar (if visible)
pub fn render_view(frame: &mut ratatui::Frame, view: &View<'_>) {
    let (main, status) = split_area(frame.area(), view.status_bar);

    let background = match view.flash {
        Some(f) => view.background.brightened(f),
        None => view.background,
    };
    frame.render_widget(
        Block::default().style(Style::default().bg(to_color(background))),
        main,
    );

    if let Some(image) = view.image {
        frame.render_widget(AsciiCanvas::new(image).brightness(view.flash), main);
    }

    if view.modal.visible {
        render_modal(frame, view.modal, main);
    }

    if view.status_bar.visible {
        render_status_bar(frame, view.status_bar, view.status, status);
    }
}
