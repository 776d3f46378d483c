mod init;

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::rolling::Rotation;

pub use init::{init_logging, parse_rotation};

/// File name of the daemon log inside the log directory.
pub const LOG_FILENAME: &str = "itemdeck-daemon.log";

static LOG_FILE_PATH: OnceLock<String> = OnceLock::new();

/// Remember where the daemon writes its log. Only the first call wins.
pub fn set_log_file_path(path: String) {
    if LOG_FILE_PATH.set(path).is_err() {
        tracing::debug!("Log file path already set");
    }
}

/// Log file path recorded at startup, or `""` before that.
pub fn get_log_file_path() -> &'static str {
    LOG_FILE_PATH.get().map_or("", String::as_str)
}

/// `~/.itemdeck/logs`, falling back to `./.itemdeck/logs` without a home dir.
#[must_use]
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".itemdeck")
        .join("logs")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines, colored on stdout
    #[default]
    Plain,
    /// One JSON object per event, for log aggregation
    Json,
}

impl From<bool> for LogFormat {
    fn from(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

#[derive(Debug)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    /// Level for this crate when `RUST_LOG` is unset
    pub level: Level,
    pub format: LogFormat,
    pub rotation: Rotation,
}

impl LogConfig {
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILENAME)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            level: Level::INFO,
            format: LogFormat::Plain,
            rotation: Rotation::DAILY,
        }
    }
}

#[cfg(test)]
#[path = "../logging_tests.rs"]
mod logging_tests;
