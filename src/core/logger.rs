//! Loggers and record fan-out
//!
//! A [`Logger`] binds one sink to a threshold and a format. The
//! [`Dispatcher`] owns every configured logger of a registry and delivers
//! each record to all of them independently.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    format::{Format, DEFAULT_FORMAT_NAME},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::Record,
};
use crate::sinks::Sink;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// One sink with its threshold and format
pub struct Logger {
    level: LogLevel,
    format: Arc<Format>,
    sink: Sink,
}

impl Logger {
    pub fn new(level: LogLevel, format: Arc<Format>, sink: impl Into<Sink>) -> Self {
        Self {
            level,
            format,
            sink: sink.into(),
        }
    }

    /// Resolve the format reference and open the sink
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::UndefinedFormat`] when the format name is not in
    /// `formats`, or the sink construction error. The format is resolved
    /// first, so no file is touched for a logger with a bad reference.
    pub fn from_config(
        config: &LoggerConfig,
        formats: &HashMap<String, Arc<Format>>,
    ) -> Result<Self> {
        let name = if config.format.is_empty() {
            DEFAULT_FORMAT_NAME
        } else {
            config.format.as_str()
        };
        let format = formats
            .get(name)
            .cloned()
            .ok_or_else(|| LoggerError::undefined_format(name))?;

        let sink = Sink::from_config(config)?;
        Ok(Self::new(config.level, format, sink))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Render and write a record if it meets the threshold
    ///
    /// Returns `Ok(false)` when the record was filtered out.
    pub fn write(&self, record: &Record) -> Result<bool> {
        if !self.accepts(record.level()) {
            return Ok(false);
        }
        let line = self.format.render(record);
        self.sink.write(record.level(), &line)?;
        Ok(true)
    }
}

/// The logger set shared by a registry and all of its handles
pub struct Dispatcher {
    loggers: Vec<Logger>,
    metrics: LoggerMetrics,
}

impl Dispatcher {
    pub fn new(loggers: Vec<Logger>) -> Self {
        Self {
            loggers,
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn loggers(&self) -> &[Logger] {
        &self.loggers
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Whether any logger would accept a record at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.loggers.iter().any(|logger| logger.accepts(level))
    }

    /// Deliver a record to every logger, isolating failures per logger
    ///
    /// Errors and panics are reported on stderr and counted, never
    /// propagated. Returns the number of sinks that received the record.
    pub fn dispatch(&self, record: &Record) -> usize {
        self.metrics.record_emitted();
        let mut delivered = 0;

        for (idx, logger) in self.loggers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| logger.write(record)));

            match result {
                Ok(Ok(true)) => {
                    self.metrics.record_written();
                    delivered += 1;
                }
                Ok(Ok(false)) => {
                    self.metrics.record_filtered();
                }
                Ok(Err(e)) => {
                    self.metrics.record_failed();
                    eprintln!(
                        "[LOGGER ERROR] Logger #{} ({}) failed: {}",
                        idx,
                        logger.sink.name(),
                        e
                    );
                }
                Err(panic_info) => {
                    self.metrics.record_failed();
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Logger #{} ({}) panicked: {}. \
                         Other loggers continue to function.",
                        idx,
                        logger.sink.name(),
                        panic_msg
                    );
                }
            }
        }

        delivered
    }
}
