//! Permission modal shown until the camera stream starts.

use ratatui::layout::Rect;

/// Message shown when the camera could not be opened.
pub const ACCESS_NOTICE: &str = "Could not access camera. Please allow permissions and try again.";

/// Centered overlay asking the user to start the camera.
///
/// It only offers start and quit; the other keys still act behind it.
/// A failed start keeps it up with a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionModal {
    pub visible: bool,
    /// Error from the last start attempt
    pub notice: Option<String>,
}

impl Default for PermissionModal {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionModal {
    /// Visible, without a notice.
    pub fn new() -> Self {
        Self {
            visible: true,
            notice: None,
        }
    }

    /// Hide after a successful start.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.notice = None;
    }

    /// Show again with a notice after a failed start.
    pub fn fail(&mut self, detail: impl Into<String>) {
        self.visible = true;
        self.notice = Some(detail.into());
    }

    /// Text lines of the modal body.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Turn your face into live ASCII art.".to_string(),
            String::new(),
            "[Enter] start camera    [q] quit".to_string(),
        ];
        if let Some(notice) = &self.notice {
            lines.push(String::new());
            lines.push(ACCESS_NOTICE.to_string());
            lines.push(notice.clone());
        }
        lines
    }

    /// Centered rectangle for the modal, clamped to the container.
    pub fn calculate_rect(&self, container: Rect) -> Rect {
        let lines = self.lines();
        let content_width = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0) as u16;
        // border plus one column of padding on each side
        let width = content_width.saturating_add(4).min(container.width);
        let height = (lines.len() as u16).saturating_add(2).min(container.height);

        Rect {
            x: container.x + container.width.saturating_sub(width) / 2,
            y: container.y + container.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_starts_visible() {
        let modal = PermissionModal::new();
        assert!(modal.visible);
        assert!(modal.notice.is_none());
        assert_eq!(modal.lines().len(), 3);
    }

    #[test]
    fn test_fail_then_dismiss() {
        let mut modal = PermissionModal::new();
        modal.dismiss();
        assert!(!modal.visible);

        modal.fail("permission denied");
        assert!(modal.visible);
        assert!(modal.lines().iter().any(|l| l == ACCESS_NOTICE));
        assert!(modal.lines().iter().any(|l| l == "permission denied"));

        modal.dismiss();
        assert!(modal.notice.is_none());
    }

    #[test]
    fn test_rect_is_centered() {
        let modal = PermissionModal::new();
        let container = Rect::new(0, 0, 100, 40);
        let rect = modal.calculate_rect(container);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.y, (40 - 5) / 2);
        assert_eq!(rect.x, (100 - rect.width) / 2);
    }

    #[test]
    fn test_rect_clamped_to_small_container() {
        let mut modal = PermissionModal::new();
        modal.fail("x");
        let rect = modal.calculate_rect(Rect::new(2, 1, 10, 4));
        assert_eq!((rect.width, rect.height), (10, 4));
        assert_eq!((rect.x, rect.y), (2, 1));
    }
}
