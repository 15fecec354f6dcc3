//! Sink implementations
//!
//! The set of sinks is closed: a [`Sink`] is either a console or a rotating
//! file, chosen by the logger's configured type tag.

pub mod console;
pub mod rotating_file;

pub use console::{CaptureBuffer, ConsoleSink};
pub use rotating_file::{Backup, RotatingFileSink, RotationPolicy, RotationStrategy};

use crate::core::{LogLevel, LoggerConfig, Result, SinkKind};

pub enum Sink {
    Console(ConsoleSink),
    File(RotatingFileSink),
}

impl Sink {
    /// Build the sink described by a validated logger configuration
    ///
    /// # Errors
    ///
    /// Fails when a file sink cannot create or open its file.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        match (config.kind, &config.file) {
            (SinkKind::File, Some(file)) => Ok(Sink::File(RotatingFileSink::from_config(file)?)),
            _ => Ok(Sink::Console(ConsoleSink::with_config(
                &config.console.clone().unwrap_or_default(),
            ))),
        }
    }

    /// Write one rendered line
    pub fn write(&self, level: LogLevel, line: &str) -> Result<()> {
        match self {
            Sink::Console(sink) => sink.write(level, line),
            Sink::File(sink) => sink.write(line),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Sink::Console(sink) => sink.name(),
            Sink::File(sink) => sink.name(),
        }
    }
}

impl From<ConsoleSink> for Sink {
    fn from(sink: ConsoleSink) -> Self {
        Sink::Console(sink)
    }
}

impl From<RotatingFileSink> for Sink {
    fn from(sink: RotatingFileSink) -> Self {
        Sink::File(sink)
    }
}
