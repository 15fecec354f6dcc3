//! Core types: records, formats, loggers, handles and the registry

pub mod config;
pub mod error;
pub mod format;
pub mod handle;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod timestamp;

pub use config::{
    Config, ConsoleConfig, ConsoleStream, FileConfig, FormatConfig, LoggerConfig, SinkKind,
};
pub use error::{LoggerError, Result};
pub use format::{Format, Layout, DEFAULT_FORMAT_NAME, DEFAULT_TEMPLATE};
pub use handle::LogHandle;
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use logger::{Dispatcher, Logger};
pub use metrics::LoggerMetrics;
pub use record::{Location, Record};
pub use registry::{Registry, RegistryBuilder};
pub use timestamp::TimestampFormat;
