//! Configuration file handling for ascii-face.
//!
//! Loads configuration from `~/.config/ascii-face/config.toml` or a custom path.
//! The file is read-only from the app's point of view: runtime changes such as
//! the color toggle are never written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ascii::{AsciiRenderer, CharSet, GlyphRamp, Rgb, SampleFilter};
use crate::ascii::{DEFAULT_CELL_ASPECT, DEFAULT_COLUMNS};
use crate::auto_capture::{AutoCapture, DEFAULT_CLOSE_AFTER, DEFAULT_INTERVAL};
use crate::camera::{Facing, StreamConstraints};
use crate::export::{SnapshotExporter, DEFAULT_STEM};
use crate::pipeline::{PipelineOptions, DEFAULT_REFRESH_HZ};

/// Largest accepted column count.
pub const MAX_COLUMNS: u16 = 1000;

/// Largest accepted refresh rate.
pub const MAX_REFRESH_HZ: u32 = 240;

/// Largest accepted number of timed captures.
pub const MAX_CAPTURES: u32 = 1000;

/// Configuration file structure for ascii-face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub ascii: AsciiConfig,
    pub display: DisplayConfig,
    pub snapshot: SnapshotConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Preferred capture width
    pub width: u32,
    /// Preferred capture height
    pub height: u32,
    /// "user" (mirrored) or "environment"
    pub facing: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let c = StreamConstraints::default();
        Self {
            width: c.preferred_width,
            height: c.preferred_height,
            facing: c.facing.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    pub columns: u16,
    /// Preset name: standard, blocks, minimal, dense
    pub charset: String,
    /// Custom ramp, darkest first; overrides `charset`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ramp: Option<String>,
    /// Glyph cell width / height
    pub cell_aspect: f32,
    /// box, nearest, bilinear
    pub sampling: String,
    /// Start in color mode (false = accent color)
    pub color: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            charset: CharSet::default().name().to_string(),
            ramp: None,
            cell_aspect: DEFAULT_CELL_ASPECT,
            sampling: SampleFilter::default().name().to_string(),
            color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_hz: u32,
    pub status_bar: bool,
    /// Start the camera without waiting for the start key
    pub autostart: bool,
    pub accent: String,
    pub background: String,
    /// Terminal cell size used when the terminal does not report pixels
    pub cell_width_px: f32,
    pub cell_height_px: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_hz: DEFAULT_REFRESH_HZ,
            status_bar: true,
            autostart: false,
            accent: Rgb::ACCENT.to_string(),
            background: Rgb::BACKGROUND.to_string(),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Output directory; defaults to the pictures directory, then the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub stem: String,
    /// Also write the glyph grid as text
    pub text: bool,
    /// Timed captures once the camera runs; 0 turns them off
    pub count: u32,
    /// Seconds between timed captures
    pub interval_secs: u64,
    /// Seconds to wait after the last timed capture before closing
    pub close_after_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: None,
            stem: DEFAULT_STEM.to_string(),
            text: true,
            count: 0,
            interval_secs: DEFAULT_INTERVAL.as_secs(),
            close_after_secs: DEFAULT_CLOSE_AFTER.as_secs(),
        }
    }
}

impl SnapshotConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => expand_home(dir),
            None => dirs::picture_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Replace a leading `~` component with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// off, error, warn, info, debug, trace
    pub level: String,
    /// Log file; defaults to the cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

impl Config {
    /// Load configuration from a file path, or the default path.
    ///
    /// Returns the default config if the file doesn't exist, and an error if
    /// it exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML (used by `config show`).
    pub fn to_toml(&self) -> String {
        // Serializing plain structs of strings and numbers cannot fail.
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check every value that can be wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(invalid("camera.width/height", "must be greater than 0"));
        }
        self.facing()?;

        if self.ascii.columns == 0 || self.ascii.columns > MAX_COLUMNS {
            return Err(invalid(
                "ascii.columns",
                format!("must be between 1 and {}", MAX_COLUMNS),
            ));
        }
        if !(self.ascii.cell_aspect.is_finite() && self.ascii.cell_aspect > 0.0) {
            return Err(invalid("ascii.cell_aspect", "must be a positive number"));
        }
        self.ramp()?;
        self.sampling()?;

        if self.display.refresh_hz == 0 || self.display.refresh_hz > MAX_REFRESH_HZ {
            return Err(invalid(
                "display.refresh_hz",
                format!("must be between 1 and {}", MAX_REFRESH_HZ),
            ));
        }
        self.renderer()?;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.display.cell_width_px) || !positive(self.display.cell_height_px) {
            return Err(invalid("display.cell_width_px/cell_height_px", "must be positive"));
        }

        if self.snapshot.stem.trim().is_empty() || self.snapshot.stem.contains(['/', '\\']) {
            return Err(invalid("snapshot.stem", "must be a plain, non-empty file name"));
        }
        if self.snapshot.count > MAX_CAPTURES {
            return Err(invalid(
                "snapshot.count",
                format!("must be at most {}", MAX_CAPTURES),
            ));
        }
        if self.snapshot.count > 0 && self.snapshot.interval_secs == 0 {
            return Err(invalid("snapshot.interval_secs", "must be at least 1"));
        }

        self.log_level()?;
        Ok(())
    }

    pub fn facing(&self) -> Result<Facing, ConfigError> {
        self.camera.facing.parse::<Facing>().map_err(|e| invalid("camera.facing", e))
    }

    /// The configured glyph ramp; a custom `ramp` string wins over `charset`.
    pub fn ramp(&self) -> Result<GlyphRamp, ConfigError> {
        match &self.ascii.ramp {
            Some(custom) => GlyphRamp::new(custom.chars()).map_err(|e| invalid("ascii.ramp", e)),
            None => self
                .ascii
                .charset
                .parse::<CharSet>()
                .map(|c| c.ramp())
                .map_err(|e| invalid("ascii.charset", e)),
        }
    }

    /// Name shown in the status bar for the active ramp.
    pub fn ramp_name(&self) -> String {
        match &self.ascii.ramp {
            Some(_) => "custom".to_string(),
            None => self.ascii.charset.to_ascii_lowercase(),
        }
    }

    pub fn sampling(&self) -> Result<SampleFilter, ConfigError> {
        self.ascii.sampling.parse::<SampleFilter>().map_err(|e| invalid("ascii.sampling", e))
    }

    pub fn renderer(&self) -> Result<AsciiRenderer, ConfigError> {
        let accent = self
            .display
            .accent
            .parse::<Rgb>()
            .map_err(|e| invalid("display.accent", e))?;
        let background = self
            .display
            .background
            .parse::<Rgb>()
            .map_err(|e| invalid("display.background", e))?;
        Ok(AsciiRenderer::new(accent, background))
    }

    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log
            .level
            .parse::<log::LevelFilter>()
            .map_err(|_| invalid("log.level", format!("unknown level '{}'", self.log.level)))
    }

    /// Everything the pipeline controller needs.
    pub fn pipeline_options(&self) -> Result<PipelineOptions, ConfigError> {
        Ok(PipelineOptions {
            target_columns: self.ascii.columns,
            cell_aspect: self.ascii.cell_aspect,
            constraints: StreamConstraints {
                preferred_width: self.camera.width,
                preferred_height: self.camera.height,
                facing: self.facing()?,
            },
            ramp: self.ramp()?,
            renderer: self.renderer()?,
            filter: self.sampling()?,
            color_mode: self.ascii.color,
        })
    }

    pub fn snapshot_exporter(&self) -> SnapshotExporter {
        SnapshotExporter::new(self.snapshot.resolved_dir())
            .with_stem(self.snapshot.stem.clone())
            .with_text(self.snapshot.text)
    }

    /// Timed capture settings, if `[snapshot].count` is set.
    pub fn auto_capture(&self) -> Option<AutoCapture> {
        AutoCapture::new(
            self.snapshot.count,
            Duration::from_secs(self.snapshot.interval_secs),
            Duration::from_secs(self.snapshot.close_after_secs),
        )
    }

    /// Log file with a leading `~` expanded.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(expand_home)
    }

    /// Fallback terminal cell size in pixels.
    pub fn fallback_cell_px(&self) -> (f32, f32) {
        (self.display.cell_width_px, self.display.cell_height_px)
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-face").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-face/config.toml")
        })
}

/// Commented default config written by `config init`.
pub const DEFAULT_CONFIG: &str = r##"# ascii-face configuration

[camera]
# Preferred capture size (the device picks the closest it supports)
width = 1280
height = 720
# "user" mirrors the image like a mirror, "environment" shows it as captured
facing = "user"

[ascii]
# Number of character columns
columns = 120
# Preset: standard, blocks, minimal, dense
charset = "standard"
# Custom ramp, darkest first (overrides charset)
# ramp = " .:-=+*#%@"
# Glyph cell width / height
cell_aspect = 0.5
# Downsampling: box, nearest, bilinear
sampling = "box"
# Start in color mode (false = accent color)
color = true

[display]
refresh_hz = 60
status_bar = true
# Start the camera without waiting for Enter
autostart = false
accent = "#00ffbf"
background = "#050505"
# Terminal cell size when the terminal does not report pixel sizes
cell_width_px = 8.0
cell_height_px = 16.0

[snapshot]
# Output directory (default: pictures directory); a leading ~ is the home directory
# dir = "~/Pictures/ascii-face"
stem = "ascii-face-capture"
# Also save the glyph grid as .txt
text = true
# Timed captures once the camera starts (0 = off), then close the session
count = 0
interval_secs = 5
close_after_secs = 5

[log]
# off, error, warn, info, debug, trace
level = "info"
# file = "/tmp/ascii-face.log"
"##;

/// Write [`DEFAULT_CONFIG`] to `path`, refusing to overwrite.
pub fn init(path: &Path) -> Result<(), ConfigError> {
    let io_err = |e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if path.exists() {
        return Err(io_err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "config file already exists",
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(io_err)
}
