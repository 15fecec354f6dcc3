//! Configuration consumed by [`Registry::new`](crate::Registry::new)
//!
//! These are plain data structures. Loading them from files or the command
//! line is left to the embedding application; they derive serde traits so any
//! serde format can produce them.

use super::error::{LoggerError, Result};
use super::format::{Layout, DEFAULT_FORMAT_NAME};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use crate::sinks::console::CaptureBuffer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete logging configuration
///
/// # Example
///
/// ```
/// use rust_logs::core::Config;
///
/// let config: Config = serde_json::from_str(r#"{
///     "formats": [{ "name": "short", "template": "{level} {message}" }],
///     "loggers": [
///         { "type": "console", "level": "warn", "format": "short" },
///         { "type": "file", "level": "debug", "file": { "path": "/tmp/app.log", "max_backups": 3 } }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.loggers.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub formats: Vec<FormatConfig>,
    #[serde(default)]
    pub loggers: Vec<LoggerConfig>,
}

impl Default for Config {
    /// A single console logger at Info using the default format
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            loggers: vec![LoggerConfig::console(LogLevel::Info)],
        }
    }
}

impl Config {
    /// A configuration with no formats and no loggers
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
            loggers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: FormatConfig) -> Self {
        self.formats.push(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_logger(mut self, logger: LoggerConfig) -> Self {
        self.loggers.push(logger);
        self
    }
}

/// A named format specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Unique key; the empty name replaces the built-in default format
    #[serde(default)]
    pub name: String,
    /// Text template, see [`Format`](crate::Format) for placeholders
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub timestamp: TimestampFormat,
}

impl FormatConfig {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            layout: Layout::default(),
            timestamp: TimestampFormat::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_timestamp(mut self, timestamp: TimestampFormat) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Sink type tag of a logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Console,
    File,
}

/// One sink with its own threshold and format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(rename = "type")]
    pub kind: SinkKind,
    #[serde(default)]
    pub level: LogLevel,
    /// Format name; empty selects the default format
    #[serde(default)]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileConfig>,
}

impl LoggerConfig {
    pub fn console(level: LogLevel) -> Self {
        Self {
            kind: SinkKind::Console,
            level,
            format: DEFAULT_FORMAT_NAME.to_string(),
            console: None,
            file: None,
        }
    }

    pub fn file(level: LogLevel, file: FileConfig) -> Self {
        Self {
            kind: SinkKind::File,
            level,
            format: DEFAULT_FORMAT_NAME.to_string(),
            console: None,
            file: Some(file),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_console(mut self, console: ConsoleConfig) -> Self {
        self.console = Some(console);
        self
    }

    /// Check that the sink parameters match the sink type
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] when a file logger has no
    /// file parameters or a console logger carries some.
    pub fn validate(&self) -> Result<()> {
        match (self.kind, &self.file) {
            (SinkKind::File, None) => Err(LoggerError::config(
                "file logger",
                "missing file parameters",
            )),
            (SinkKind::File, Some(file)) if file.path.as_os_str().is_empty() => Err(
                LoggerError::config("file logger", "file path must not be empty"),
            ),
            (SinkKind::Console, Some(_)) => Err(LoggerError::config(
                "console logger",
                "file parameters given for a console sink",
            )),
            _ => Ok(()),
        }
    }
}

/// Where console output goes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Error and Fatal to stderr, everything else to stdout
    #[default]
    Auto,
    Stdout,
    Stderr,
    /// In-memory buffer, set programmatically
    #[serde(skip)]
    Capture(CaptureBuffer),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub stream: ConsoleStream,
    #[serde(default = "default_colors")]
    pub colors: bool,
}

fn default_colors() -> bool {
    true
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            stream: ConsoleStream::default(),
            colors: default_colors(),
        }
    }
}

impl ConsoleConfig {
    /// Console output collected into `buffer`, without colors
    pub fn capture(buffer: CaptureBuffer) -> Self {
        Self {
            stream: ConsoleStream::Capture(buffer),
            colors: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_stream(mut self, stream: ConsoleStream) -> Self {
        self.stream = stream;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}

/// File sink parameters
///
/// Zero values select the defaults: 100 MB maximum size, no age pruning,
/// and all backups retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub max_size_mb: u64,
    #[serde(default)]
    pub max_age_days: u64,
    #[serde(default)]
    pub max_backups: usize,
    /// Gzip rotated backups
    #[serde(default)]
    pub compress: bool,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_mb: 0,
            max_age_days: 0,
            max_backups: 0,
            compress: false,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_size_mb(mut self, size: u64) -> Self {
        self.max_size_mb = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}
