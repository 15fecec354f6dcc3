//! Formatting macros for log handles
//!
//! These macros accept `format!`-style arguments and forward the rendered
//! message to a [`LogHandle`](crate::LogHandle). The message is only
//! formatted when at least one logger would accept the level.
//!
//! # Examples
//!
//! ```
//! use rust_logs::prelude::*;
//! use rust_logs::info;
//!
//! let registry = Registry::new(Config::default()).unwrap();
//! let log = registry.get_handle("server");
//!
//! info!(log, "Server started");
//!
//! let port = 8080;
//! info!(log, "Listening on port {}", port);
//! ```

/// Log a formatted message at an explicit level.
///
/// ```
/// # use rust_logs::prelude::*;
/// # let log = Registry::new(Config::default()).unwrap().get_handle("app");
/// use rust_logs::log;
/// log!(log, LogLevel::Info, "Simple message");
/// log!(log, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($handle:expr, $level:expr, $($arg:tt)+) => {{
        let level = $level;
        let handle = &$handle;
        if handle.enabled(level) {
            handle.log(level, format!($($arg)+), $crate::LogContext::new());
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_logs::prelude::*;
/// # let log = Registry::new(Config::default()).unwrap().get_handle("app");
/// use rust_logs::warn;
/// warn!(log, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only logs; it never terminates the process.
#[macro_export]
macro_rules! fatal {
    ($handle:expr, $($arg:tt)+) => {
        $crate::log!($handle, $crate::LogLevel::Fatal, $($arg)+)
    };
}
