//! Named log handles

use super::{
    log_context::LogContext,
    log_level::LogLevel,
    logger::Dispatcher,
    record::{Location, Record},
};
use std::fmt;
use std::sync::Arc;

struct HandleInner {
    name: String,
    dispatcher: Arc<Dispatcher>,
}

/// Per-name facade that fans records out to every configured logger
///
/// Handles are obtained from [`Registry::get_handle`](crate::Registry::get_handle)
/// and are cheap to clone; clones share the same instance. Emission never
/// fails and never blocks on a failing sink.
///
/// # Example
///
/// ```
/// use rust_logs::{LogContext, Registry};
///
/// let registry = Registry::new(Default::default()).unwrap();
/// let log = registry.get_handle("http");
///
/// log.info("listening");
/// log.warn_with("slow request", LogContext::new().with_field("ms", 950));
/// ```
#[derive(Clone)]
pub struct LogHandle {
    inner: Arc<HandleInner>,
}

impl LogHandle {
    pub(crate) fn new(name: impl Into<String>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                name: name.into(),
                dispatcher,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether two handles are the same cached instance
    pub fn ptr_eq(&self, other: &LogHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether any logger would write a record at `level`
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.inner.dispatcher.enabled(level)
    }

    /// Emit a record at `level` with structured fields
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        let record = Record::new(level, self.inner.name.as_str(), message)
            .with_location(Location::caller())
            .with_context(context);
        self.inner.dispatcher.dispatch(&record);
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Trace, message, LogContext::new());
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message, LogContext::new());
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message, LogContext::new());
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message, LogContext::new());
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message, LogContext::new());
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message, LogContext::new());
    }

    #[track_caller]
    pub fn trace_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Trace, message, context);
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Debug, message, context);
    }

    #[track_caller]
    pub fn info_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Info, message, context);
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Warn, message, context);
    }

    #[track_caller]
    pub fn error_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Error, message, context);
    }

    #[track_caller]
    pub fn fatal_with(&self, message: impl AsRef<str>, context: LogContext) {
        self.log(LogLevel::Fatal, message, context);
    }
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("name", &self.inner.name)
            .field("loggers", &self.inner.dispatcher.loggers().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConsoleConfig, Format, FormatConfig, Logger};
    use crate::sinks::{CaptureBuffer, ConsoleSink};

    fn handle_with_capture(level: LogLevel, template: &str) -> (LogHandle, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let format = Arc::new(Format::compile(&FormatConfig::new("t", template)).unwrap());
        let sink = ConsoleSink::with_config(&ConsoleConfig::capture(buffer.clone()));
        let dispatcher = Arc::new(Dispatcher::new(vec![Logger::new(level, format, sink)]));
        (LogHandle::new("db", dispatcher), buffer)
    }

    #[test]
    fn test_level_methods() {
        let (log, buffer) = handle_with_capture(LogLevel::Trace, "{level} {name} {message}");

        log.trace("t");
        log.debug("d");
        log.info("i");
        log.warn("w");
        log.error("e");
        log.fatal("f");

        assert_eq!(
            buffer.lines(),
            vec!["TRACE db t", "DEBUG db d", "INFO db i", "WARN db w", "ERROR db e", "FATAL db f"]
        );
    }

    #[test]
    fn test_fields_are_rendered() {
        let (log, buffer) = handle_with_capture(LogLevel::Info, "{message}{fields}");
        log.info_with("query", LogContext::new().with_field("rows", 3).with_field("table", "users"));
        assert_eq!(buffer.lines(), vec!["query rows=3 table=users"]);
    }

    #[test]
    fn test_call_site_is_recorded() {
        let (log, buffer) = handle_with_capture(LogLevel::Info, "{file}:{line}");
        let line = line!() + 1;
        log.info("where");
        assert_eq!(buffer.lines(), vec![format!("{}:{}", file!(), line)]);
    }

    #[test]
    fn test_clones_share_identity() {
        let (log, _) = handle_with_capture(LogLevel::Info, "{message}");
        let clone = log.clone();
        assert!(log.ptr_eq(&clone));
        assert_eq!(clone.name(), "db");
        assert!(format!("{:?}", log).contains("db"));
    }

    #[test]
    fn test_enabled() {
        let (log, buffer) = handle_with_capture(LogLevel::Warn, "{message}");
        assert!(!log.enabled(LogLevel::Info));
        assert!(log.enabled(LogLevel::Error));

        log.info("dropped");
        assert!(buffer.contents().is_empty());
    }
}
