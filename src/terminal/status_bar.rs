//! Status bar for displaying pipeline state at the bottom of the screen.

/// What the status bar reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub running: bool,
    pub color_mode: bool,
    /// Grid size, when geometry is known
    pub grid: Option<(u16, u16)>,
    pub charset: String,
    /// Timed capture countdown
    pub countdown: Option<String>,
    /// Transient message, e.g. the last saved snapshot
    pub message: Option<String>,
}

/// Status bar for displaying pipeline state at the bottom of the screen.
///
/// Shows: cam:on/off | color/mono | columns x rows | charset | countdown | message
#[derive(Debug, Clone)]
pub struct StatusBar {
    /// Whether the status bar is visible
    pub visible: bool,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    /// Create a new status bar with default settings (visible).
    pub fn new() -> Self {
        Self { visible: true }
    }

    /// Create a status bar with the specified visibility.
    pub fn with_visibility(visible: bool) -> Self {
        Self { visible }
    }

    /// Rows the bar takes from the screen.
    pub fn height(&self) -> u16 {
        u16::from(self.visible)
    }

    /// Format: " cam:on | color | 120x33 | standard | message "
    pub fn format(&self, info: &StatusInfo) -> String {
        let grid = info
            .grid
            .map(|(c, r)| format!("{}x{}", c, r))
            .unwrap_or_else(|| "-".to_string());
        let mut text = format!(
            " {} | {} | {} | {} ",
            if info.running { "cam:on" } else { "cam:off" },
            if info.color_mode { "color" } else { "mono" },
            grid,
            info.charset,
        );
        for extra in [&info.countdown, &info.message].into_iter().flatten() {
            text.push_str("| ");
            text.push_str(extra);
            text.push(' ');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> StatusInfo {
        StatusInfo {
            running: true,
            color_mode: false,
            grid: Some((120, 33)),
            charset: "standard".to_string(),
            countdown: None,
            message: None,
        }
    }

    #[test]
    fn test_format_running() {
        assert_eq!(
            StatusBar::new().format(&info()),
            " cam:on | mono | 120x33 | standard "
        );
    }

    #[test]
    fn test_format_without_geometry_and_with_message() {
        let mut info = info();
        info.running = false;
        info.color_mode = true;
        info.grid = None;
        info.message = Some("saved a.png".to_string());
        assert_eq!(
            StatusBar::new().format(&info),
            " cam:off | color | - | standard | saved a.png "
        );
    }

    #[test]
    fn test_countdown_precedes_message() {
        let mut info = info();
        info.countdown = Some("capture 1/2 in 4s".to_string());
        assert_eq!(
            StatusBar::new().format(&info),
            " cam:on | mono | 120x33 | standard | capture 1/2 in 4s "
        );
        info.message = Some("saved a.png".to_string());
        assert!(StatusBar::new()
            .format(&info)
            .ends_with("| capture 1/2 in 4s | saved a.png "));
    }

    #[test]
    fn test_height_follows_visibility() {
        assert_eq!(StatusBar::new().height(), 1);
        assert_eq!(StatusBar::with_visibility(false).height(), 0);
    }
}
