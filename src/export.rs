//! Snapshot export: rasterize the current draw list to PNG, plus a plain-text
//! copy of the glyph grid, and the brief flash shown as feedback.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::ascii::{paint, DrawList, GridGeometry};
use crate::surface::RasterSurface;

/// File stem used when none is configured.
pub const DEFAULT_STEM: &str = "ascii-face-capture";

/// How long the snapshot flash lasts.
pub const FLASH_DURATION: Duration = Duration::from_millis(100);

/// Brightness multiplier while the flash is active (200%).
pub const FLASH_BRIGHTNESS: f32 = 2.0;

/// Suffixes tried before giving up on finding a free file name.
const MAX_SUFFIX: u32 = 10_000;

/// Errors that can occur while exporting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A short brightness pulse confirming a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    started: Instant,
}

impl Flash {
    pub fn start(now: Instant) -> Self {
        Self { started: now }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < FLASH_DURATION
    }

    /// Brightness factor to apply at `now`, or `None` once the flash is over.
    pub fn brightness(&self, now: Instant) -> Option<f32> {
        self.is_active(now).then_some(FLASH_BRIGHTNESS)
    }

    /// When the flash ends.
    pub fn deadline(&self) -> Instant {
        self.started + FLASH_DURATION
    }
}

/// Files written by one export.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub png: PathBuf,
    pub text: Option<PathBuf>,
    /// PNG size in pixels
    pub width: u32,
    pub height: u32,
    pub flash: Flash,
}

/// Writes snapshots into a directory without overwriting existing files.
#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    dir: PathBuf,
    stem: String,
    write_text: bool,
}

impl SnapshotExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stem: DEFAULT_STEM.to_string(),
            write_text: true,
        }
    }

    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Also write the glyph grid as `<stem>.txt`.
    pub fn with_text(mut self, write_text: bool) -> Self {
        self.write_text = write_text;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rasterize `list` at the backing resolution of `geometry` and write it out.
    pub fn export(&self, list: &DrawList, geometry: &GridGeometry) -> Result<Snapshot, ExportError> {
        let surface = rasterize(list, geometry);
        let png_bytes = surface.encode_png()?;

        fs::create_dir_all(&self.dir).map_err(|e| ExportError::io(&self.dir, e))?;
        let (png_path, mut png_file) = self.create_free()?;
        png_file
            .write_all(&png_bytes)
            .map_err(|e| ExportError::io(&png_path, e))?;

        drop(png_file);

        let text = if self.write_text {
            let path = png_path.with_extension("txt");
            let mut grid = list.to_text();
            grid.push('\n');
            if let Err(e) = fs::write(&path, grid) {
                // a snapshot is both files or neither
                if let Err(remove) = fs::remove_file(&png_path) {
                    log::warn!("Failed to remove {}: {}", png_path.display(), remove);
                }
                return Err(ExportError::io(&path, e));
            }
            Some(path)
        } else {
            None
        };

        log::info!(
            "Snapshot saved to {} ({}x{})",
            png_path.display(),
            surface.width(),
            surface.height()
        );

        Ok(Snapshot {
            png: png_path,
            text,
            width: surface.width(),
            height: surface.height(),
            flash: Flash::start(Instant::now()),
        })
    }

    /// Create the first `<stem>[-N].png` whose PNG and text siblings are both free.
    fn create_free(&self) -> Result<(PathBuf, fs::File), ExportError> {
        for n in 0..MAX_SUFFIX {
            let stem = if n == 0 {
                self.stem.clone()
            } else {
                format!("{}-{}", self.stem, n)
            };
            let png = self.dir.join(format!("{}.png", stem));
            if self.write_text && png.with_extension("txt").exists() {
                continue;
            }
            match OpenOptions::new().write(true).create_new(true).open(&png) {
                Ok(file) => return Ok((png, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ExportError::io(&png, e)),
            }
        }
        let png = self.dir.join(format!("{}.png", self.stem));
        Err(ExportError::io(
            &png,
            io::Error::new(io::ErrorKind::AlreadyExists, "no free snapshot file name"),
        ))
    }
}

/// Paint `list` onto a fresh raster surface sized to the backing store.
pub fn rasterize(list: &DrawList, geometry: &GridGeometry) -> RasterSurface {
    let mut surface = RasterSurface::for_geometry(geometry);
    paint(list, &mut surface);
    surface
}
