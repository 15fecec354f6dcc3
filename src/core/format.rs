//! Named record formats
//!
//! A [`Format`] is compiled once from a [`FormatConfig`] and then renders
//! records as pure functions of the record and its own settings:
//! - `Text`: a template with `{placeholder}` segments (default)
//! - `Json`: one JSON object per record
//! - `Logfmt`: `key=value` pairs for log aggregation tools

use super::config::FormatConfig;
use super::error::{LoggerError, Result};
use super::log_context::FieldValue;
use super::record::{escape_line_breaks, Record};
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Name under which the default format is registered
pub const DEFAULT_FORMAT_NAME: &str = "";

/// Template used when a text format leaves its template empty
pub const DEFAULT_TEMPLATE: &str = "[{timestamp}] [{level:5}] {name} - {message}{fields}";

/// Output layout of a format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Template-driven text (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] http - Request processed`
    #[default]
    Text,

    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","name":"http","message":"Request processed"}`
    Json,

    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO name=http message="Request processed"`
    Logfmt,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Timestamp(Option<TimestampFormat>),
    Level { width: usize },
    Name,
    Message,
    Fields,
    Thread,
    File,
    Line,
}

/// A compiled, named format
#[derive(Debug, Clone)]
pub struct Format {
    name: String,
    layout: Layout,
    segments: Vec<Segment>,
    timestamp: TimestampFormat,
}

impl Format {
    /// Compile a format configuration
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidTemplate`] for unknown placeholders,
    /// bad placeholder arguments or unbalanced braces.
    pub fn compile(config: &FormatConfig) -> Result<Self> {
        let template = if config.template.is_empty() {
            DEFAULT_TEMPLATE
        } else {
            config.template.as_str()
        };
        if !config.timestamp.is_valid() {
            return Err(LoggerError::template(
                config.name.as_str(),
                format!("invalid timestamp format {:?}", config.timestamp),
            ));
        }
        let segments = match config.layout {
            Layout::Text => parse_template(&config.name, template)?,
            Layout::Json | Layout::Logfmt => Vec::new(),
        };

        Ok(Self {
            name: config.name.clone(),
            layout: config.layout,
            segments,
            timestamp: config.timestamp.clone(),
        })
    }

    /// The format registered under the empty name when none is configured
    pub fn default_format() -> Self {
        Self {
            name: DEFAULT_FORMAT_NAME.to_string(),
            layout: Layout::Text,
            segments: parse_template(DEFAULT_FORMAT_NAME, DEFAULT_TEMPLATE)
                .unwrap_or_else(|_| vec![Segment::Message]),
            timestamp: TimestampFormat::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Render a record to a single line without trailing newline
    pub fn render(&self, record: &Record) -> String {
        match self.layout {
            Layout::Text => self.render_text(record),
            Layout::Json => self.render_json(record),
            Layout::Logfmt => self.render_logfmt(record),
        }
    }

    fn render_text(&self, record: &Record) -> String {
        let mut out = String::with_capacity(128);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Timestamp(custom) => {
                    let format = custom.as_ref().unwrap_or(&self.timestamp);
                    out.push_str(&format.format(record.timestamp()));
                }
                Segment::Level { width } => {
                    out.push_str(&format!("{:width$}", record.level(), width = *width));
                }
                Segment::Name => out.push_str(record.name()),
                Segment::Message => out.push_str(record.message()),
                Segment::Fields => {
                    if !record.context().is_empty() {
                        out.push(' ');
                        out.push_str(&record.context().format_fields());
                    }
                }
                Segment::Thread => out.push_str(record.thread()),
                Segment::File => {
                    out.push_str(record.location().map(|l| l.file.as_str()).unwrap_or("-"));
                }
                Segment::Line => match record.location() {
                    Some(location) => out.push_str(&location.line.to_string()),
                    None => out.push('-'),
                },
            }
        }
        out
    }

    fn render_json(&self, record: &Record) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            self.timestamp.to_json_value(record.timestamp()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level().to_str().to_string()),
        );
        json_obj.insert(
            "name".to_string(),
            serde_json::Value::String(record.name().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message().to_string()),
        );
        json_obj.insert(
            "thread".to_string(),
            serde_json::Value::String(record.thread().to_string()),
        );

        if let Some(location) = record.location() {
            json_obj.insert(
                "file".to_string(),
                serde_json::Value::String(location.file.clone()),
            );
            json_obj.insert(
                "line".to_string(),
                serde_json::Value::Number(location.line.into()),
            );
        }

        // Core keys win over context fields with the same name
        for (key, value) in record.context().fields() {
            json_obj
                .entry(key.to_string())
                .or_insert_with(|| value.to_json_value());
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    fn render_logfmt(&self, record: &Record) -> String {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&self.timestamp.format(record.timestamp()))
            ),
            format!("level={}", record.level().to_str()),
            format!("name={}", escape_logfmt_value(record.name())),
            format!("message={}", quote_logfmt_value(record.message())),
            format!("thread={}", escape_logfmt_value(record.thread())),
        ];

        if let Some(location) = record.location() {
            parts.push(format!("file={}", escape_logfmt_value(&location.file)));
            parts.push(format!("line={}", location.line));
        }

        for (key, value) in record.context().fields() {
            let formatted_value = match value {
                FieldValue::String(s) => quote_logfmt_value(s),
                other => other.to_string(),
            };
            parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
        }

        parts.join(" ")
    }
}

fn parse_template(format: &str, template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(c);
                }
                if !closed {
                    return Err(LoggerError::template(
                        format,
                        format!("unclosed placeholder '{{{}'", placeholder),
                    ));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(parse_placeholder(format, &placeholder)?);
            }
            '}' => {
                return Err(LoggerError::template(format, "unmatched '}'"));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_placeholder(format: &str, placeholder: &str) -> Result<Segment> {
    let (key, arg) = match placeholder.split_once(':') {
        Some((key, arg)) => (key.trim(), Some(arg)),
        None => (placeholder.trim(), None),
    };

    let segment = match (key, arg) {
        ("timestamp", None) => Segment::Timestamp(None),
        ("timestamp", Some(pattern)) => {
            let custom = TimestampFormat::Custom(pattern.to_string());
            if !custom.is_valid() {
                return Err(LoggerError::template(
                    format,
                    format!("invalid timestamp pattern '{}'", pattern),
                ));
            }
            Segment::Timestamp(Some(custom))
        }
        ("level", None) => Segment::Level { width: 0 },
        ("level", Some(width)) => {
            let width = width.trim().parse().map_err(|_| {
                LoggerError::template(format, format!("invalid level width '{}'", width))
            })?;
            Segment::Level { width }
        }
        ("name", None) => Segment::Name,
        ("message", None) => Segment::Message,
        ("fields", None) => Segment::Fields,
        ("thread", None) => Segment::Thread,
        ("file", None) => Segment::File,
        ("line", None) => Segment::Line,
        (key, Some(_)) if is_known(key) => {
            return Err(LoggerError::template(
                format,
                format!("placeholder {{{}}} takes no argument", key),
            ));
        }
        _ => {
            return Err(LoggerError::template(
                format,
                format!("unknown placeholder {{{}}}", placeholder),
            ));
        }
    };
    Ok(segment)
}

fn is_known(key: &str) -> bool {
    matches!(key, "name" | "message" | "fields" | "thread" | "file" | "line")
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Escape a logfmt value (quote if contains spaces)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escape_line_breaks(&escaped))
}
