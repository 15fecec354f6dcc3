//! Registry of formats, loggers and cached handles
//!
//! A registry is an ordinary value: build it once at startup and pass it
//! (or clones of it) to whatever needs handles. There is no process-wide
//! instance.

use super::{
    config::{Config, FormatConfig, LoggerConfig},
    error::{LoggerError, Result},
    format::{Format, DEFAULT_FORMAT_NAME},
    handle::LogHandle,
    logger::{Dispatcher, Logger},
    metrics::LoggerMetrics,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct RegistryInner {
    formats: HashMap<String, Arc<Format>>,
    dispatcher: Arc<Dispatcher>,
    handles: Mutex<HashMap<String, LogHandle>>,
}

/// Owns the configured loggers and hands out named [`LogHandle`]s
///
/// Clones share the same loggers and handle cache.
///
/// # Example
///
/// ```
/// use rust_logs::prelude::*;
///
/// let registry = Registry::builder()
///     .format(FormatConfig::new("short", "{level} {name}: {message}"))
///     .logger(LoggerConfig::console(LogLevel::Warn).with_format("short"))
///     .build()
///     .unwrap();
///
/// let a = registry.get_handle("db");
/// let b = registry.get_handle("db");
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Compile all formats and open all loggers
    ///
    /// The caller decides whether a failure is fatal; nothing here exits
    /// the process.
    ///
    /// # Errors
    ///
    /// - [`LoggerError::DuplicateFormat`] when two formats share a name
    /// - [`LoggerError::InvalidTemplate`] when a template does not compile
    /// - [`LoggerError::UndefinedFormat`] when a logger names an unknown format
    /// - [`LoggerError::InvalidConfiguration`] / [`LoggerError::FileSinkError`]
    ///   when a sink is misconfigured or its file cannot be opened
    pub fn new(config: Config) -> Result<Self> {
        let formats = Self::compile_formats(&config.formats)?;

        let loggers = config
            .loggers
            .iter()
            .map(|logger| Logger::from_config(logger, &formats))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_parts(formats, loggers))
    }

    /// Assemble a registry from already constructed loggers
    ///
    /// The default format is added to `formats` when missing.
    pub fn from_parts(mut formats: HashMap<String, Arc<Format>>, loggers: Vec<Logger>) -> Self {
        formats
            .entry(DEFAULT_FORMAT_NAME.to_string())
            .or_insert_with(|| Arc::new(Format::default_format()));

        Self {
            inner: Arc::new(RegistryInner {
                formats,
                dispatcher: Arc::new(Dispatcher::new(loggers)),
                handles: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn compile_formats(configs: &[FormatConfig]) -> Result<HashMap<String, Arc<Format>>> {
        let mut formats = HashMap::with_capacity(configs.len() + 1);
        for config in configs {
            if formats.contains_key(&config.name) {
                return Err(LoggerError::duplicate_format(config.name.as_str()));
            }
            formats.insert(config.name.clone(), Arc::new(Format::compile(config)?));
        }
        formats
            .entry(DEFAULT_FORMAT_NAME.to_string())
            .or_insert_with(|| Arc::new(Format::default_format()));
        Ok(formats)
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Return the handle cached under `name`, creating it on first use
    ///
    /// Concurrent calls with the same name get the same instance. The lock is
    /// held only for the lookup-or-insert, never while writing to sinks.
    pub fn get_handle(&self, name: &str) -> LogHandle {
        let mut handles = self.inner.handles.lock();
        if let Some(handle) = handles.get(name) {
            return handle.clone();
        }
        let handle = LogHandle::new(name, Arc::clone(&self.inner.dispatcher));
        handles.insert(name.to_string(), handle.clone());
        handle
    }

    /// Number of distinct handles created so far
    pub fn handle_count(&self) -> usize {
        self.inner.handles.lock().len()
    }

    pub fn format(&self, name: &str) -> Option<Arc<Format>> {
        self.inner.formats.get(name).cloned()
    }

    /// Registered format names, sorted
    pub fn format_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.formats.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn loggers(&self) -> &[Logger] {
        self.inner.dispatcher.loggers()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.inner.dispatcher.metrics()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("formats", &self.format_names())
            .field("loggers", &self.loggers().len())
            .field("handles", &self.handle_count())
            .finish()
    }
}

/// Builder for constructing a [`Registry`] with a fluent API
///
/// Starts from an empty configuration; `build()` with nothing added yields a
/// registry with no loggers.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: Config,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::empty(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: FormatConfig) -> Self {
        self.config.formats.push(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger(mut self, logger: LoggerConfig) -> Self {
        self.config.loggers.push(logger);
        self
    }

    /// Build the Registry
    ///
    /// # Errors
    ///
    /// Same as [`Registry::new`].
    pub fn build(self) -> Result<Registry> {
        Registry::new(self.config)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
