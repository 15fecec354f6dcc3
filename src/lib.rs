//! # Rust Logs
//!
//! A structured logging facade: obtain a named handle from a [`Registry`],
//! emit leveled records, and every configured logger decides on its own
//! threshold and format whether and how the record reaches its sink.
//!
//! ## Features
//!
//! - **Named handles**: cached per name, identical instance on every lookup
//! - **Independent loggers**: each with its own level, format and sink
//! - **Rotating files**: size/time rotation with age and count retention
//! - **Never in the way**: sink failures are isolated and never reach callers
//!
//! ```
//! use rust_logs::prelude::*;
//!
//! let registry = Registry::new(Config::default())?;
//! let log = registry.get_handle("main");
//! log.info("started");
//! # Ok::<(), rust_logs::LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Config, ConsoleConfig, ConsoleStream, FieldValue, FileConfig, Format, FormatConfig,
        Layout, LogContext, LogHandle, LogLevel, Logger, LoggerConfig, LoggerError,
        LoggerMetrics, Record, Registry, RegistryBuilder, Result, SinkKind, TimestampFormat,
    };
    pub use crate::sinks::{CaptureBuffer, ConsoleSink, RotatingFileSink, RotationPolicy, Sink};
}

pub use crate::core::{
    Config, ConsoleConfig, ConsoleStream, FieldValue, FileConfig, Format, FormatConfig, Layout,
    LogContext, LogHandle, LogLevel, Logger, LoggerConfig, LoggerError, LoggerMetrics, Record,
    Registry, RegistryBuilder, Result, SinkKind, TimestampFormat,
};
pub use sinks::{CaptureBuffer, ConsoleSink, RotatingFileSink, RotationPolicy, Sink};
