//! Console sink implementation

use crate::core::{ConsoleConfig, ConsoleStream, LogLevel, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

#[cfg(feature = "console")]
use colored::Colorize;

/// Shared in-memory target for console output
///
/// Clones share the same buffer, so a caller can keep one clone and hand
/// the other to the configuration.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    fn append(&self, line: &str) {
        let mut buffer = self.inner.lock();
        buffer.extend_from_slice(line.as_bytes());
        buffer.push(b'\n');
    }
}

impl PartialEq for CaptureBuffer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

pub struct ConsoleSink {
    stream: ConsoleStream,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_config(&ConsoleConfig::default())
    }

    pub fn with_config(config: &ConsoleConfig) -> Self {
        Self {
            stream: config.stream.clone(),
            use_colors: config.colors && !matches!(config.stream, ConsoleStream::Capture(_)),
        }
    }

    /// Append one rendered line plus newline to the selected stream
    pub fn write(&self, level: LogLevel, line: &str) -> Result<()> {
        match &self.stream {
            ConsoleStream::Capture(buffer) => {
                buffer.append(line);
                Ok(())
            }
            ConsoleStream::Stdout => self.write_to(std::io::stdout().lock(), level, line),
            ConsoleStream::Stderr => self.write_to(std::io::stderr().lock(), level, line),
            ConsoleStream::Auto if level.is_severe() => {
                self.write_to(std::io::stderr().lock(), level, line)
            }
            ConsoleStream::Auto => self.write_to(std::io::stdout().lock(), level, line),
        }
    }

    fn write_to<W: Write>(&self, mut out: W, level: LogLevel, line: &str) -> Result<()> {
        // One write_all per line keeps concurrent lines from interleaving
        let mut output = self.styled(level, line);
        output.push('\n');
        out.write_all(output.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    #[cfg(feature = "console")]
    fn styled(&self, level: LogLevel, line: &str) -> String {
        if self.use_colors {
            line.color(level.color_code()).to_string()
        } else {
            line.to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn styled(&self, _level: LogLevel, line: &str) -> String {
        line.to_string()
    }

    pub fn name(&self) -> &str {
        "console"
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_appends_lines() {
        let buffer = CaptureBuffer::new();
        let sink = ConsoleSink::with_config(&ConsoleConfig::capture(buffer.clone()));

        sink.write(LogLevel::Info, "first").unwrap();
        sink.write(LogLevel::Error, "second").unwrap();

        assert_eq!(buffer.contents(), "first\nsecond\n");
        assert_eq!(buffer.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_capture_never_colored() {
        let buffer = CaptureBuffer::new();
        let config = ConsoleConfig::capture(buffer.clone()).with_colors(true);
        let sink = ConsoleSink::with_config(&config);

        sink.write(LogLevel::Warn, "plain").unwrap();
        assert_eq!(buffer.contents(), "plain\n");
    }

    #[test]
    fn test_capture_buffer_identity() {
        let a = CaptureBuffer::new();
        assert_eq!(a, a.clone());
        assert_ne!(a, CaptureBuffer::new());

        a.append("x");
        a.clear();
        assert!(a.contents().is_empty());
    }

    #[test]
    fn test_standard_streams() {
        let sink = ConsoleSink::with_config(&ConsoleConfig::default().with_colors(false));
        assert!(sink.write(LogLevel::Info, "to stdout").is_ok());
        assert!(sink.write(LogLevel::Error, "to stderr").is_ok());
        assert_eq!(sink.name(), "console");
    }
}
