//! Log record structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

fn has_line_breaks(text: &str) -> bool {
    text.contains(|c: char| matches!(c, '\n' | '\r' | '\t'))
}

/// Escape newlines, carriage returns and tabs
///
/// Applied to every piece of caller-supplied text that reaches a text
/// layout, so one record always renders as one physical line and callers
/// cannot inject fake entries.
pub(crate) fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if !has_line_breaks(text) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}

/// Call site of an emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

/// One structured log event
///
/// Built once per emission and only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    level: LogLevel,
    name: String,
    message: String,
    timestamp: DateTime<Utc>,
    location: Option<Location>,
    thread_id: String,
    thread_name: Option<String>,
    #[serde(default, skip_serializing_if = "LogContext::is_empty")]
    context: LogContext,
}

impl Record {
    pub fn new(level: LogLevel, name: impl Into<String>, message: impl AsRef<str>) -> Self {
        let name = name.into();
        let name = if has_line_breaks(&name) {
            escape_line_breaks(&name).into_owned()
        } else {
            name
        };
        Self {
            level,
            name,
            message: escape_line_breaks(message.as_ref()).into_owned(),
            timestamp: Utc::now(),
            location: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            context: LogContext::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    /// Pin the timestamp, mostly useful for reproducible rendering
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// Thread name when set, otherwise the thread id
    pub fn thread(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}
