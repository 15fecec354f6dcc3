//! Integration tests for the logging facade
//!
//! These tests verify:
//! - Per-logger thresholds and formats
//! - Handle caching
//! - Construction errors
//! - Log injection prevention
//! - File sink rotation and retention through a registry
//! - Structured output layouts

use rust_logs::core::{Dispatcher, DEFAULT_FORMAT_NAME};
use rust_logs::prelude::*;
use rust_logs::sinks::RotationStrategy;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn capture_logger(level: LogLevel, format: &str) -> (LoggerConfig, CaptureBuffer) {
    let buffer = CaptureBuffer::new();
    let config = LoggerConfig::console(level)
        .with_format(format)
        .with_console(ConsoleConfig::capture(buffer.clone()));
    (config, buffer)
}

#[test]
fn test_console_warn_and_file_debug_fan_out() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let (console, buffer) = capture_logger(LogLevel::Warn, "plain");
    let registry = Registry::builder()
        .format(FormatConfig::new("plain", "{level} {name} {message}"))
        .logger(console)
        .logger(LoggerConfig::file(LogLevel::Debug, FileConfig::new(&log_file)).with_format("plain"))
        .build()
        .expect("Failed to build registry");

    let log = registry.get_handle("svc");
    log.info("a");
    log.error("b");

    assert_eq!(buffer.lines(), vec!["ERROR svc b"]);

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content, "INFO svc a\nERROR svc b\n");
}

#[test]
fn test_handles_are_cached_per_name() {
    let registry = Registry::new(Config::empty()).expect("Failed to build registry");

    let first = registry.get_handle("orders");
    let second = registry.get_handle("orders");
    let other = registry.get_handle("payments");

    assert!(first.ptr_eq(&second));
    assert!(!first.ptr_eq(&other));
    assert_eq!(first.name(), "orders");
}

#[test]
fn test_duplicate_format_is_a_construction_error() {
    let result = Registry::builder()
        .format(FormatConfig::new("f1", "{message}"))
        .format(FormatConfig::new("f1", "{level} {message}"))
        .build();

    let err = result.expect_err("duplicate format must fail");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("f1"));
}

#[test]
fn test_undefined_format_is_a_construction_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("untouched.log");

    let result = Registry::builder()
        .logger(LoggerConfig::file(LogLevel::Info, FileConfig::new(&log_file)).with_format("missing"))
        .build();

    assert!(matches!(result, Err(LoggerError::UndefinedFormat { ref name }) if name == "missing"));
    assert!(!log_file.exists());
}

#[test]
fn test_invalid_template_is_a_construction_error() {
    let result = Registry::builder()
        .format(FormatConfig::new("bad", "{message"))
        .build();

    assert!(matches!(result, Err(LoggerError::InvalidTemplate { .. })));
}

#[test]
fn test_empty_registry_discards_records() {
    let registry = Registry::new(Config::empty()).expect("Failed to build registry");
    let log = registry.get_handle("quiet");

    log.fatal("nobody listens");

    assert!(registry.loggers().is_empty());
    assert_eq!(registry.metrics().records_emitted(), 1);
    assert_eq!(registry.metrics().deliveries_written(), 0);
}

#[test]
fn test_log_injection_prevention() {
    let (console, buffer) = capture_logger(LogLevel::Info, "");
    let registry = Registry::builder()
        .logger(console)
        .build()
        .expect("Failed to build registry");

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    registry.get_handle("auth").info(malicious_message);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
    assert!(lines[0].contains("\\n"));
    assert!(lines[0].contains("auth - User login"));
}

#[test]
fn test_field_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fields.log");

    let registry = Registry::builder()
        .logger(LoggerConfig::file(LogLevel::Info, FileConfig::new(&log_file)))
        .build()
        .expect("Failed to build registry");

    registry.get_handle("x").info_with(
        "one record",
        LogContext::new().with_field("user", "bob\nERROR [fake] injected"),
    );

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1, "one record must stay one line");
    assert!(content.contains("x - one record user=bob\\nERROR [fake] injected"));
}

#[test]
fn test_invalid_timestamp_pattern_is_a_construction_error() {
    let (console, buffer) = capture_logger(LogLevel::Info, "stamped");
    let result = Registry::builder()
        .format(FormatConfig::new("stamped", "{timestamp:%Q} {message}"))
        .logger(console)
        .build();

    assert!(matches!(result, Err(LoggerError::InvalidTemplate { ref format, .. }) if format == "stamped"));
    assert!(buffer.contents().is_empty());

    let result = Registry::builder()
        .format(
            FormatConfig::new("stamped", "{message}")
                .with_timestamp(TimestampFormat::Custom("%Q".to_string())),
        )
        .build();
    assert!(matches!(result, Err(LoggerError::InvalidTemplate { .. })));
}

#[test]
fn test_default_format_shape() {
    let (console, buffer) = capture_logger(LogLevel::Info, DEFAULT_FORMAT_NAME);
    let registry = Registry::builder()
        .logger(console)
        .build()
        .expect("Failed to build registry");

    registry
        .get_handle("db")
        .warn_with("slow query", LogContext::new().with_field("ms", 1200));

    let line = &buffer.lines()[0];
    assert!(line.starts_with('['));
    assert!(line.ends_with("] [WARN ] db - slow query ms=1200"), "got {line}");
}

#[test]
fn test_json_layout_output() {
    let (console, buffer) = capture_logger(LogLevel::Info, "json");
    let registry = Registry::builder()
        .format(
            FormatConfig::new("json", "")
                .with_layout(Layout::Json)
                .with_timestamp(TimestampFormat::UnixMillis),
        )
        .logger(console)
        .build()
        .expect("Failed to build registry");

    registry.get_handle("api").info_with(
        "request",
        LogContext::new()
            .with_field("status", 200)
            .with_field("level", "shadowed"),
    );

    let parsed: serde_json::Value =
        serde_json::from_str(&buffer.lines()[0]).expect("Output should be valid JSON");
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["name"], "api");
    assert_eq!(parsed["message"], "request");
    assert_eq!(parsed["status"], 200);
    assert!(parsed["timestamp"].is_number());
    assert!(parsed["file"].as_str().unwrap().ends_with("integration_tests.rs"));
}

#[test]
fn test_config_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("from_json.log");

    let json = serde_json::json!({
        "formats": [{ "name": "short", "template": "{level} {message}" }],
        "loggers": [
            { "type": "file", "level": "WARNING", "format": "short", "file": { "path": log_file } }
        ]
    });
    let config: Config = serde_json::from_value(json).expect("Failed to parse config");

    let registry = Registry::new(config).expect("Failed to build registry");
    let log = registry.get_handle("cfg");
    log.info("skipped");
    log.warn("kept");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content, "WARN kept\n");
}

#[test]
fn test_file_logger_without_file_section_fails() {
    let mut config = LoggerConfig::console(LogLevel::Info);
    config.kind = SinkKind::File;

    let result = Registry::new(Config::empty().with_logger(config));
    assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
}

#[test]
fn test_rotation_through_registry() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("rotating.log");

    let policy = RotationPolicy::new()
        .with_strategy(RotationStrategy::size(64))
        .with_max_backups(2);
    let sink = RotatingFileSink::with_policy(&log_file, policy).expect("Failed to open sink");
    let format = Arc::new(
        Format::compile(&FormatConfig::new("m", "{message}")).expect("Failed to compile format"),
    );

    let registry = Registry::from_parts(HashMap::new(), vec![Logger::new(LogLevel::Info, format, sink)]);
    let log = registry.get_handle("rot");
    for i in 0..20 {
        log.info(format!("line {:02} padded to width", i));
    }

    let Sink::File(file_sink) = registry.loggers()[0].sink() else {
        panic!("expected a file sink");
    };
    let backups = file_sink.backups();
    assert_eq!(backups.len(), 2);
    assert_eq!(backups[0].index, 1);
    assert_eq!(backups[1].index, 2);
    assert!(!temp_dir.path().join("rotating.log.3").exists());

    // 24-byte lines against a 64-byte limit: every third line rotates
    let newest = fs::read_to_string(&backups[0].path).expect("Failed to read backup");
    assert_eq!(newest.lines().count(), 3);
    assert!(newest.contains("line 17"));

    let active = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(active.lines().collect::<Vec<_>>(), vec!["line 18 padded to width", "line 19 padded to width"]);
    assert_eq!(file_sink.rotation_count(), 6);
}

#[test]
fn test_fatal_does_not_terminate() {
    let (console, buffer) = capture_logger(LogLevel::Trace, "");
    let registry = Registry::builder()
        .logger(console)
        .build()
        .expect("Failed to build registry");

    registry.get_handle("boom").fatal("still alive");
    registry.get_handle("boom").info("after fatal");

    assert_eq!(buffer.lines().len(), 2);
}

#[test]
fn test_dispatcher_reports_delivery_count() {
    let (config, buffer) = capture_logger(LogLevel::Info, "");
    let formats: HashMap<String, Arc<Format>> =
        [(String::new(), Arc::new(Format::default_format()))].into_iter().collect();
    let logger = Logger::from_config(&config, &formats).expect("Failed to build logger");
    let dispatcher = Dispatcher::new(vec![logger]);

    assert_eq!(dispatcher.dispatch(&Record::new(LogLevel::Debug, "d", "filtered")), 0);
    assert_eq!(dispatcher.dispatch(&Record::new(LogLevel::Info, "d", "written")), 1);
    assert_eq!(buffer.lines().len(), 1);
}
