//! Stress tests for concurrent use of a registry
//!
//! These tests verify:
//! - Concurrent handle lookups converge on one instance per name
//! - No line is lost or duplicated across rotations under concurrent writers
//! - Retention never exceeds the configured backup count
//! - A failing logger does not disturb the healthy ones under load

use rust_logs::prelude::*;
use rust_logs::sinks::RotationStrategy;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn plain_format() -> Arc<Format> {
    Arc::new(Format::compile(&FormatConfig::new("plain", "{message}")).expect("Failed to compile format"))
}

fn read_all_lines(dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        let content = fs::read_to_string(&path).expect("Failed to read log file");
        lines.extend(content.lines().map(str::to_string));
    }
    lines
}

#[test]
fn test_concurrent_get_handle_identity() {
    let registry = Registry::new(Config::empty()).expect("Failed to build registry");
    let barrier = Arc::new(Barrier::new(8));

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..50)
                    .map(|i| registry.get_handle(&format!("component-{}", i % 5)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut by_name: HashMap<String, LogHandle> = HashMap::new();
    for t in threads {
        for handle in t.join().expect("Thread panicked") {
            let first = by_name
                .entry(handle.name().to_string())
                .or_insert_with(|| handle.clone());
            assert!(first.ptr_eq(&handle), "two instances for {}", handle.name());
        }
    }

    assert_eq!(by_name.len(), 5);
    assert_eq!(registry.handle_count(), 5);
}

#[test]
fn test_concurrent_rotation_no_loss_no_duplicates() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");

    // Keep every backup so all lines can be counted afterwards
    let policy = RotationPolicy::new().with_strategy(RotationStrategy::size(2048));
    let sink = RotatingFileSink::with_policy(&log_file, policy).expect("Failed to open sink");
    let registry = Registry::from_parts(
        HashMap::new(),
        vec![Logger::new(LogLevel::Trace, plain_format(), sink)],
    );

    let num_threads = 8;
    let per_thread = 500;

    let threads: Vec<_> = (0..num_threads)
        .map(|t| {
            let log = registry.get_handle("worker");
            thread::spawn(move || {
                for i in 0..per_thread {
                    log.info(format!("t{:02}-m{:04}", t, i));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread panicked");
    }

    let lines = read_all_lines(temp_dir.path());
    assert_eq!(lines.len(), num_threads * per_thread);

    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), lines.len(), "duplicate lines after rotation");
    assert!(lines.iter().all(|l| l.len() == 9), "interleaved writes detected");

    let Sink::File(file_sink) = registry.loggers()[0].sink() else {
        panic!("expected a file sink");
    };
    assert!(file_sink.rotation_count() > 0);
    assert_eq!(registry.metrics().deliveries_failed(), 0);
}

#[test]
fn test_retention_bound_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("bounded.log");

    let policy = RotationPolicy::new()
        .with_strategy(RotationStrategy::size(256))
        .with_max_backups(3);
    let sink = RotatingFileSink::with_policy(&log_file, policy).expect("Failed to open sink");
    let registry = Registry::from_parts(
        HashMap::new(),
        vec![Logger::new(LogLevel::Info, plain_format(), sink)],
    );

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let log = registry.get_handle("bounded");
            thread::spawn(move || {
                for i in 0..300 {
                    log.info(format!("thread {} message {}", t, i));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread panicked");
    }

    let Sink::File(file_sink) = registry.loggers()[0].sink() else {
        panic!("expected a file sink");
    };
    let backups = file_sink.backups();
    assert_eq!(backups.len(), 3);
    assert_eq!(
        backups.iter().map(|b| b.index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let files = fs::read_dir(temp_dir.path()).expect("Failed to read dir").count();
    assert_eq!(files, 4, "active file plus three backups");
}

#[test]
#[cfg(target_os = "linux")]
fn test_failing_logger_isolated_under_load() {
    let buffer = CaptureBuffer::new();
    let broken = Logger::new(
        LogLevel::Trace,
        plain_format(),
        RotatingFileSink::new("/dev/full").expect("Failed to open /dev/full"),
    );
    let healthy = Logger::new(
        LogLevel::Trace,
        plain_format(),
        ConsoleSink::with_config(&ConsoleConfig::capture(buffer.clone())),
    );
    let registry = Registry::from_parts(HashMap::new(), vec![broken, healthy]);

    let threads: Vec<_> = (0..4)
        .map(|t| {
            let log = registry.get_handle("mixed");
            thread::spawn(move || {
                for i in 0..50 {
                    log.warn(format!("{}-{}", t, i));
                }
            })
        })
        .collect();

    for t in threads {
        t.join().expect("Thread panicked");
    }

    assert_eq!(buffer.lines().len(), 200);
    assert_eq!(registry.metrics().deliveries_failed(), 200);
    assert_eq!(registry.metrics().deliveries_written(), 200);
}
