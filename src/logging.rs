//! File-backed `log` backend.
//!
//! The terminal belongs to the TUI, so log records go to a file:
//! `[log].file`, or `<cache dir>/ascii-face/ascii-face.log`.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

/// Errors that can occur while installing the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a logger is already installed")]
    AlreadyInstalled,
}

/// Default log file location.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ascii-face")
        .join("ascii-face.log")
}

/// Appends formatted records to a file.
pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    /// Open (or create) `path` for appending.
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self, LoggingError> {
        let io_err = |e| LoggingError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    fn format(record: &Record) -> String {
        format!(
            "{} [{}] {}: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = Self::format(record);
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install a [`FileLogger`] as the global logger. Returns the log file path.
///
/// `LevelFilter::Off` skips installation entirely.
pub fn init(path: Option<&Path>, level: LevelFilter) -> Result<Option<PathBuf>, LoggingError> {
    if level == LevelFilter::Off {
        return Ok(None);
    }
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let logger = FileLogger::open(&path, level)?;
    log::set_logger(Box::leak(Box::new(logger))).map_err(|_| LoggingError::AlreadyInstalled)?;
    log::set_max_level(level);
    Ok(Some(path))
}
