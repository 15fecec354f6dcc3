//! Error types for the logging facade
//!
//! Only construction-time problems are surfaced to callers. Failures while
//! emitting records stay inside the dispatch layer and are reported on the
//! diagnostic channel instead.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Two formats were configured under the same name
    #[error("Duplicate format \"{name}\"")]
    DuplicateFormat { name: String },

    /// A logger references a format name that was never configured
    #[error("Undefined format \"{name}\"")]
    UndefinedFormat { name: String },

    /// A format template could not be compiled
    #[error("Invalid template for format \"{format}\": {message}")]
    InvalidTemplate { format: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn duplicate_format(name: impl Into<String>) -> Self {
        LoggerError::DuplicateFormat { name: name.into() }
    }

    pub fn undefined_format(name: impl Into<String>) -> Self {
        LoggerError::UndefinedFormat { name: name.into() }
    }

    pub fn template(format: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidTemplate {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error belongs to the configuration class
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::DuplicateFormat { .. }
                | LoggerError::UndefinedFormat { .. }
                | LoggerError::InvalidTemplate { .. }
                | LoggerError::InvalidConfiguration { .. }
                | LoggerError::FileSinkError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::duplicate_format("f1");
        assert!(matches!(err, LoggerError::DuplicateFormat { .. }));

        let err = LoggerError::config("FileSink", "Invalid path");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::duplicate_format("f1");
        assert_eq!(err.to_string(), "Duplicate format \"f1\"");

        let err = LoggerError::undefined_format("missing");
        assert_eq!(err.to_string(), "Undefined format \"missing\"");

        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::template("short", "unknown placeholder {foo}");
        assert_eq!(
            err.to_string(),
            "Invalid template for format \"short\": unknown placeholder {foo}"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_class() {
        assert!(LoggerError::undefined_format("x").is_configuration());
        assert!(LoggerError::file_sink("/x", "denied").is_configuration());
        assert!(!LoggerError::file_rotation("/x", "full").is_configuration());
    }
}
