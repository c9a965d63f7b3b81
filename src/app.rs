//! Interactive session: terminal setup, input handling and the frame loop.

use crossterm::event::{self, Event};
use ratatui::layout::Rect;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::ascii::{CharSet, Rgb};
use crate::auto_capture::{AutoCapture, AutoCaptureStep};
use crate::camera::{CameraProvider, NokhwaCameraProvider};
use crate::config::{Config, ConfigError};
use crate::export::{Flash, SnapshotExporter};
use crate::input::{handle_key_event, UiAction};
use crate::pipeline::{
    FrameScheduler, IntervalScheduler, PipelineController, PipelineError, Viewport,
};
use crate::terminal::{
    self, split_area, PermissionModal, StatusBar, StatusInfo, TerminalImage, TerminalSurface, Tui,
    View,
};

/// Longest the loop blocks on input while nothing else is due.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Global flag for Ctrl+C received
static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Check if SIGINT was received outside the TUI's key handling.
pub fn quit_requested() -> bool {
    QUIT_REQUESTED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// In raw mode Ctrl+C arrives as a key event; this covers signals sent
/// from elsewhere. Call once at startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        QUIT_REQUESTED.store(true, Ordering::SeqCst);
    })
}

/// Errors that end the interactive session.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// UI state around a pipeline controller.
pub struct App<P: CameraProvider, S: FrameScheduler> {
    controller: PipelineController<P, S>,
    exporter: SnapshotExporter,
    surface: TerminalSurface,
    image: Option<TerminalImage>,
    modal: PermissionModal,
    status_bar: StatusBar,
    charset: String,
    /// Preset the charset key cycles from; `None` for a custom ramp
    preset: Option<CharSet>,
    auto_capture: Option<AutoCapture>,
    countdown: Option<String>,
    message: Option<String>,
    flash: Option<Flash>,
    background: Rgb,
    cell_px: (f32, f32),
    /// Canvas area in terminal cells (screen minus status bar)
    area: (u16, u16),
    dirty: bool,
    quit: bool,
}

impl<P: CameraProvider, S: FrameScheduler> App<P, S> {
    pub fn new(
        controller: PipelineController<P, S>,
        exporter: SnapshotExporter,
        status_bar: StatusBar,
        charset: impl Into<String>,
        cell_px: (f32, f32),
    ) -> Self {
        let background = controller.options().renderer.background;
        let charset = charset.into();
        Self {
            preset: charset.parse::<CharSet>().ok(),
            controller,
            exporter,
            surface: TerminalSurface::new(),
            image: None,
            modal: PermissionModal::new(),
            status_bar,
            charset,
            auto_capture: None,
            countdown: None,
            message: None,
            flash: None,
            background,
            cell_px,
            area: (0, 0),
            dirty: true,
            quit: false,
        }
    }

    /// Take timed snapshots once the camera runs.
    pub fn with_auto_capture(mut self, auto_capture: Option<AutoCapture>) -> Self {
        self.auto_capture = auto_capture;
        self
    }

    pub fn controller(&self) -> &PipelineController<P, S> {
        &self.controller
    }

    pub fn modal(&self) -> &PermissionModal {
        &self.modal
    }

    pub fn image(&self) -> Option<&TerminalImage> {
        self.image.as_ref()
    }

    pub fn auto_capture(&self) -> Option<&AutoCapture> {
        self.auto_capture.as_ref()
    }

    pub fn flash(&self) -> Option<Flash> {
        self.flash
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Apply one UI action.
    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Start => match self.controller.start() {
                Ok(()) => {
                    self.modal.dismiss();
                    self.message = None;
                }
                Err(e) => {
                    log::warn!("Start failed: {}", e);
                    self.modal.fail(e.to_string());
                }
            },
            UiAction::ToggleColor => {
                self.controller.toggle_color_mode();
            }
            UiAction::CycleCharset => {
                let next = self.preset.map_or(CharSet::Standard, |c| c.next());
                self.controller.set_ramp(next.ramp());
                self.preset = Some(next);
                self.charset = next.name().to_string();
            }
            UiAction::Snapshot => {
                let _ = self.save_snapshot();
            }
            UiAction::Quit => self.quit = true,
            UiAction::None => return,
        }
        self.dirty = true;
    }

    /// The terminal is now `columns x rows` cells.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        let (main, _) = split_area(Rect::new(0, 0, columns, rows), &self.status_bar);
        self.area = (main.width, main.height);
        self.controller.on_resize(Viewport::from_cells(
            main.width,
            main.height,
            self.cell_px,
        ));
        self.reproject();
        self.dirty = true;
    }

    /// Pixel size of a terminal cell changed (font change, new window size).
    pub fn set_cell_px(&mut self, cell_px: (f32, f32)) {
        self.cell_px = cell_px;
    }

    /// Advance the frame loop, timed captures and the flash. Returns whether a
    /// redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.controller.tick(now, &mut self.surface) {
            self.reproject();
            self.dirty = true;
        }
        self.tick_auto_capture(now);
        if let Some(flash) = self.flash {
            if !flash.is_active(now) {
                self.flash = None;
                self.dirty = true;
            }
        }
        self.dirty
    }

    fn tick_auto_capture(&mut self, now: Instant) {
        let Some(timer) = self.auto_capture.as_mut() else {
            return;
        };
        if self.controller.is_running() {
            timer.arm(now);
        }
        match timer.step(now) {
            AutoCaptureStep::Wait => {}
            // nothing painted yet; try again next tick
            AutoCaptureStep::Capture if self.controller.draw_list().is_none() => {}
            AutoCaptureStep::Capture => {
                let saved = self.save_snapshot().is_ok();
                if let Some(timer) = self.auto_capture.as_mut() {
                    timer.record(now);
                    log::info!(
                        "Timed capture {}/{} {}",
                        timer.taken(),
                        timer.total(),
                        if saved { "saved" } else { "failed" }
                    );
                }
            }
            AutoCaptureStep::Close => {
                log::info!("Timed captures done, closing");
                self.quit = true;
            }
        }

        let countdown = self.auto_capture.and_then(|t| t.countdown(now));
        if countdown != self.countdown {
            self.countdown = countdown;
            self.dirty = true;
        }
    }

    /// Export the last painted frame and report the result in the status bar.
    fn save_snapshot(&mut self) -> Result<(), PipelineError> {
        self.dirty = true;
        match self.controller.snapshot(&self.exporter) {
            Ok(snapshot) => {
                self.flash = Some(snapshot.flash);
                self.message = Some(format!("saved {}", snapshot.png.display()));
                Ok(())
            }
            Err(e) => {
                log::warn!("Snapshot failed: {}", e);
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// How long the loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = IDLE_POLL;
        if let Some(due) = self.controller.time_until_next_frame(now) {
            timeout = timeout.min(due);
        }
        if let Some(flash) = self.flash {
            timeout = timeout.min(flash.deadline().saturating_duration_since(now));
        }
        if let Some(deadline) = self.auto_capture.and_then(|t| t.deadline()) {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }

    pub fn status(&self) -> StatusInfo {
        StatusInfo {
            running: self.controller.is_running(),
            color_mode: self.controller.state().color_mode,
            grid: self.controller.geometry().map(|g| (g.columns, g.rows)),
            charset: self.charset.clone(),
            countdown: self.countdown.clone(),
            message: self.message.clone(),
        }
    }

    /// Draw if anything changed since the last draw.
    pub fn draw(&mut self, tui: &mut Tui, now: Instant) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let status = self.status();
        let view = View {
            image: self.image.as_ref(),
            background: self.background,
            modal: &self.modal,
            status_bar: &self.status_bar,
            status: &status,
            flash: self.flash.and_then(|f| f.brightness(now)),
        };
        tui.draw(&view)?;
        self.dirty = false;
        Ok(())
    }

    /// Release the camera.
    pub fn shutdown(&mut self) {
        self.controller.stop();
    }

    fn reproject(&mut self) {
        if self.surface.is_blank() {
            return;
        }
        self.image = Some(self.surface.project(self.area.0, self.area.1, self.cell_px));
    }
}

/// Run the interactive session until the user quits.
pub fn run(config: &Config) -> Result<(), AppError> {
    if let Err(e) = setup_ctrlc_handler() {
        log::warn!("Could not set up Ctrl+C handler: {}", e);
    }

    let controller = PipelineController::new(
        NokhwaCameraProvider::new(),
        IntervalScheduler::new(config.display.refresh_hz),
        config.pipeline_options()?,
    );
    let fallback_px = config.fallback_cell_px();
    let mut app = App::new(
        controller,
        config.snapshot_exporter(),
        StatusBar::with_visibility(config.display.status_bar),
        config.ramp_name(),
        terminal::cell_pixel_size(fallback_px),
    )
    .with_auto_capture(config.auto_capture());

    let mut tui = Tui::new()?;
    let (columns, rows) = tui.size()?;
    app.resize(columns, rows);
    log::info!("Session started in a {}x{} terminal", columns, rows);

    if config.display.autostart {
        app.handle_action(UiAction::Start);
    }

    let result = event_loop(&mut app, &mut tui, fallback_px);
    app.shutdown();
    tui.restore()?;
    result
}

fn event_loop<P: CameraProvider, S: FrameScheduler>(
    app: &mut App<P, S>,
    tui: &mut Tui,
    fallback_px: (f32, f32),
) -> Result<(), AppError> {
    while !app.should_quit() && !quit_requested() {
        let now = Instant::now();
        app.tick(now);
        app.draw(tui, now)?;

        if !event::poll(app.poll_timeout(Instant::now()))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => app.handle_action(handle_key_event(key)),
            Event::Resize(columns, rows) => {
                app.set_cell_px(terminal::cell_pixel_size(fallback_px));
                app.resize(columns, rows);
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraError, Frame, FrameSource, Resolution, StreamConstraints};
    use crate::pipeline::{ManualScheduler, PipelineOptions};

    struct StillSource(Frame);

    impl FrameSource for StillSource {
        fn resolution(&self) -> Option<Resolution> {
            Some(self.0.resolution())
        }
        fn latest_frame(&mut self) -> Option<Frame> {
            Some(self.0.clone())
        }
    }

    struct StillCamera {
        fail: bool,
    }

    impl CameraProvider for StillCamera {
        fn request_stream(
            &mut self,
            _constraints: &StreamConstraints,
        ) -> Result<Box<dyn FrameSource>, CameraError> {
            if self.fail {
                return Err(CameraError::PermissionDenied);
            }
            Ok(Box::new(StillSource(Frame::solid(160, 120, [255, 255, 255]))))
        }
    }

    fn app(fail: bool, dir: &std::path::Path) -> App<StillCamera, ManualScheduler> {
        let options = PipelineOptions {
            target_columns: 16,
            ..PipelineOptions::default()
        };
        let controller =
            PipelineController::new(StillCamera { fail }, ManualScheduler::new(), options);
        let mut app = App::new(
            controller,
            SnapshotExporter::new(dir),
            StatusBar::new(),
            "standard",
            (8.0, 16.0),
        );
        app.resize(80, 25);
        app
    }

    #[test]
    fn test_failed_start_keeps_modal_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(true, dir.path());

        app.handle_action(UiAction::Start);

        assert!(!app.controller().is_running());
        assert!(app.modal().visible);
        assert!(app.modal().notice.is_some());
        assert!(!app.status().running);
    }

    #[test]
    fn test_start_dismisses_modal_and_paints() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(false, dir.path());

        app.handle_action(UiAction::Start);
        assert!(app.controller().is_running());
        assert!(!app.modal().visible);

        assert!(app.tick(Instant::now()));
        let image = app.image().unwrap();
        assert!(image.width > 0 && image.width <= 80);
        assert!(image.height > 0 && image.height <= 24);
        assert_eq!(app.status().grid.map(|(columns, _)| columns), Some(16));
    }

    #[test]
    fn test_snapshot_before_paint_reports_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(false, dir.path());

        app.handle_action(UiAction::Snapshot);

        assert!(app.flash().is_none());
        assert!(app.status().message.is_some());
    }

    #[test]
    fn test_snapshot_starts_flash() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(false, dir.path());
        app.handle_action(UiAction::Start);
        app.tick(Instant::now());

        app.handle_action(UiAction::Snapshot);

        let flash = app.flash().unwrap();
        assert!(dir.path().join("ascii-face-capture.png").exists());
        assert!(app.poll_timeout(Instant::now()) <= Duration::from_millis(100));

        app.tick(flash.deadline() + Duration::from_millis(1));
        assert!(app.flash().is_none());
    }

    #[test]
    fn test_toggle_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(false, dir.path());
        assert!(app.status().color_mode);

        app.handle_action(UiAction::ToggleColor);
        assert!(!app.status().color_mode);

        app.handle_action(UiAction::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_cycle_charset_behind_modal() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(false, dir.path());
        assert!(app.modal().visible);

        app.handle_action(UiAction::CycleCharset);
        assert_eq!(app.status().charset, "blocks");
        assert_eq!(
            app.controller().options().ramp.glyphs(),
            CharSet::Blocks.ramp().glyphs()
        );

        for _ in 0..3 {
            app.handle_action(UiAction::CycleCharset);
        }
        assert_eq!(app.status().charset, "standard");
    }

    #[test]
    fn test_cycle_from_custom_ramp_starts_at_standard() {
        let dir = tempfile::tempdir().unwrap();
        let controller = PipelineController::new(
            StillCamera { fail: false },
            ManualScheduler::new(),
            PipelineOptions::default(),
        );
        let mut app = App::new(
            controller,
            SnapshotExporter::new(dir.path()),
            StatusBar::new(),
            "custom",
            (8.0, 16.0),
        );
        app.handle_action(UiAction::CycleCharset);
        assert_eq!(app.status().charset, "standard");
    }

    #[test]
    fn test_timed_captures_then_close() {
        let dir = tempfile::tempdir().unwrap();
        let timer = AutoCapture::new(2, Duration::from_secs(5), Duration::from_secs(1));
        let mut app = app(false, dir.path()).with_auto_capture(timer);

        // not armed until the camera runs
        let t0 = Instant::now();
        app.tick(t0);
        assert!(app.status().countdown.is_none());

        app.handle_action(UiAction::Start);
        app.tick(t0);
        assert_eq!(app.status().countdown.as_deref(), Some("capture 1/2 in 5s"));
        assert!(app.poll_timeout(t0 + Duration::from_millis(4990)) <= Duration::from_millis(10));

        app.tick(t0 + Duration::from_secs(5));
        assert!(dir.path().join("ascii-face-capture.png").exists());
        assert!(dir.path().join("ascii-face-capture.txt").exists());
        assert_eq!(app.auto_capture().map(|t| t.taken()), Some(1));
        assert_eq!(app.status().countdown.as_deref(), Some("capture 2/2 in 5s"));

        app.tick(t0 + Duration::from_secs(10));
        assert!(dir.path().join("ascii-face-capture-1.png").exists());
        assert_eq!(app.status().countdown.as_deref(), Some("closing in 1s"));
        assert!(!app.should_quit());

        app.tick(t0 + Duration::from_secs(11));
        assert!(app.should_quit());
    }

    #[test]
    fn test_idle_poll_timeout_when_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(false, dir.path());
        assert_eq!(app.poll_timeout(Instant::now()), IDLE_POLL);
    }
}
