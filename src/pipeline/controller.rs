//! The render loop: acquire a frame, sample it, render glyphs, paint, schedule.

use std::time::{Duration, Instant};

use super::error::PipelineError;
use super::scheduler::FrameScheduler;
use super::state::{RenderState, Viewport};
use crate::ascii::{
    paint, AsciiRenderer, DrawList, FrameSampler, GlyphRamp, GridGeometry, SampleFilter,
    DEFAULT_CELL_ASPECT, DEFAULT_COLUMNS,
};
use crate::camera::{CameraProvider, FrameSource, Resolution, StreamConstraints};
use crate::export::{Snapshot, SnapshotExporter};
use crate::surface::Surface;

/// Fixed parameters of a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub target_columns: u16,
    /// Glyph cell width / height
    pub cell_aspect: f32,
    pub constraints: StreamConstraints,
    pub ramp: GlyphRamp,
    pub renderer: AsciiRenderer,
    pub filter: SampleFilter,
    /// Initial color policy
    pub color_mode: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_columns: DEFAULT_COLUMNS,
            cell_aspect: DEFAULT_CELL_ASPECT,
            constraints: StreamConstraints::default(),
            ramp: GlyphRamp::default(),
            renderer: AsciiRenderer::default(),
            filter: SampleFilter::default(),
            color_mode: true,
        }
    }
}

/// Drives frames from a camera to a surface.
///
/// `Stopped -> Running -> Stopped`. Nothing is sampled or painted while
/// stopped; resizes are only remembered.
pub struct PipelineController<P: CameraProvider, S: FrameScheduler> {
    provider: P,
    scheduler: S,
    options: PipelineOptions,
    state: RenderState,
    viewport: Option<Viewport>,
    frame_size: Option<Resolution>,
    geometry: Option<GridGeometry>,
    source: Option<Box<dyn FrameSource>>,
    sampler: FrameSampler,
    draw_list: DrawList,
    /// Geometry the current draw list was rendered with
    painted: Option<GridGeometry>,
}

impl<P: CameraProvider, S: FrameScheduler> PipelineController<P, S> {
    pub fn new(provider: P, scheduler: S, options: PipelineOptions) -> Self {
        Self {
            provider,
            scheduler,
            state: RenderState {
                running: false,
                color_mode: options.color_mode,
            },
            sampler: FrameSampler::new(options.filter),
            options,
            viewport: None,
            frame_size: None,
            geometry: None,
            source: None,
            draw_list: DrawList::default(),
            painted: None,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// The draw list of the last painted frame.
    pub fn draw_list(&self) -> Option<&DrawList> {
        self.painted.map(|_| &self.draw_list)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Open the camera and begin rendering.
    ///
    /// A no-op while already running. On failure the controller stays stopped.
    ///
    /// # Errors
    /// * `CameraAccessDenied` - access was refused
    /// * `CameraUnavailable` - no device, or it could not stream
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.state.running {
            return Ok(());
        }

        let source = self
            .provider
            .request_stream(&self.options.constraints)
            .map_err(|e| {
                log::warn!("Camera request failed: {}", e);
                PipelineError::from(e)
            })?;

        self.frame_size = source.resolution();
        self.source = Some(source);
        self.state.running = true;
        log::info!(
            "Pipeline started ({} columns, frame {:?})",
            self.options.target_columns,
            self.frame_size
        );

        if let Err(e) = self.recompute_geometry() {
            log::debug!("Initial geometry deferred: {}", e);
        }
        self.scheduler.schedule_next_frame(Instant::now());
        Ok(())
    }

    /// Cancel the pending tick and release the camera.
    pub fn stop(&mut self) {
        if !self.state.running {
            return;
        }
        self.scheduler.cancel();
        // Dropping the source stops and joins the capture thread.
        self.source = None;
        self.state.running = false;
        log::info!("Pipeline stopped");
    }

    /// Remember the new container size; recompute only while running.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        if self.state.running {
            if let Err(e) = self.recompute_geometry() {
                log::debug!("Resize ignored: {}", e);
            }
        }
    }

    /// Flip between per-cell color and the accent color. Returns the new mode.
    pub fn toggle_color_mode(&mut self) -> bool {
        self.state.color_mode = !self.state.color_mode;
        log::debug!("Color mode: {}", self.state.color_mode);
        self.state.color_mode
    }

    /// Swap the glyph ramp. The next frame uses it.
    pub fn set_ramp(&mut self, ramp: GlyphRamp) {
        log::debug!("Ramp: {} glyphs", ramp.len());
        self.options.ramp = ramp;
    }

    /// Recompute geometry from the last viewport and frame size.
    ///
    /// On failure the previous geometry is kept.
    pub fn recompute_geometry(&mut self) -> Result<&GridGeometry, PipelineError> {
        let viewport = self.viewport.ok_or(PipelineError::GeometryUnready)?;
        let aspect = self
            .frame_size
            .and_then(|r| r.aspect())
            .ok_or(PipelineError::GeometryUnready)?;

        let geometry = GridGeometry::recompute(
            viewport.width_px,
            viewport.height_px,
            aspect,
            viewport.device_pixel_ratio,
            self.options.target_columns,
            self.options.cell_aspect,
        )?;
        if self.geometry != Some(geometry) {
            log::debug!(
                "Geometry {}x{} cells, canvas {:.0}x{:.0}, backing {}x{}",
                geometry.columns,
                geometry.rows,
                geometry.canvas_width_px,
                geometry.canvas_height_px,
                geometry.backing_width_px,
                geometry.backing_height_px
            );
        }
        Ok(self.geometry.insert(geometry))
    }

    /// Run one cycle: acquire, sample, render, paint, schedule the next.
    ///
    /// Returns whether the surface was repainted. Skips painting (but still
    /// reschedules) when no complete frame or geometry is available yet.
    pub fn frame_cycle(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.state.running {
            return false;
        }
        let painted = self.render_frame(surface);
        self.scheduler.schedule_next_frame(Instant::now());
        painted
    }

    /// Run a cycle if the pending tick is due at `now`.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) -> bool {
        if !self.state.running || !self.scheduler.take_due_tick(now) {
            return false;
        }
        self.frame_cycle(surface)
    }

    /// How long the UI may wait before the next tick.
    pub fn time_until_next_frame(&self, now: Instant) -> Option<Duration> {
        if self.state.running {
            self.scheduler.time_until_due(now)
        } else {
            None
        }
    }

    /// Export the last painted frame.
    ///
    /// # Errors
    /// `NothingToExport` before the first paint; `Export` when writing fails.
    pub fn snapshot(&self, exporter: &SnapshotExporter) -> Result<Snapshot, PipelineError> {
        let geometry = self.painted.ok_or(PipelineError::NothingToExport)?;
        if self.draw_list.is_empty() {
            return Err(PipelineError::NothingToExport);
        }
        Ok(exporter.export(&self.draw_list, &geometry)?)
    }

    fn render_frame(&mut self, surface: &mut dyn Surface) -> bool {
        let frame = match self.source.as_mut().and_then(|s| s.latest_frame()) {
            Some(frame) if frame.is_complete() => frame,
            _ => return false,
        };

        let size = frame.resolution();
        if self.geometry.is_none() || self.frame_size != Some(size) {
            self.frame_size = Some(size);
            if let Err(e) = self.recompute_geometry() {
                log::debug!("Frame skipped: {}", e);
            }
        }
        let Some(geometry) = self.geometry else {
            return false;
        };

        let Some(grid) = self.sampler.sample(&frame, geometry.columns, geometry.rows) else {
            return false;
        };
        self.options.renderer.render_into(
            grid,
            &geometry,
            &self.options.ramp,
            self.state.color_mode,
            &mut self.draw_list,
        );
        paint(&self.draw_list, surface);
        self.painted = Some(geometry);
        true
    }
}

impl<P: CameraProvider, S: FrameScheduler> Drop for PipelineController<P, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
