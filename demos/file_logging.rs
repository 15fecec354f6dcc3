//! File logging example
//!
//! Builds a registry with a console logger at Warn and a rotating file logger
//! at Debug, then logs through a few named handles.
//!
//! Run with: cargo run --example file_logging

use rust_logs::prelude::*;
use rust_logs::{info, warn};

fn main() {
    println!("=== Rust Logs - File Logging Example ===\n");

    let config = Config::empty()
        .with_format(FormatConfig::new("short", "{level:5} {name}: {message}{fields}"))
        .with_format(FormatConfig::new("json", "").with_layout(Layout::Json))
        .with_logger(LoggerConfig::console(LogLevel::Warn).with_format("short"))
        .with_logger(
            LoggerConfig::file(
                LogLevel::Debug,
                FileConfig::new("logs/application.log")
                    .with_max_size_mb(10)
                    .with_max_age_days(7)
                    .with_max_backups(5)
                    .with_compression(true),
            )
            .with_format("json"),
        );

    // Construction errors are reported to the caller; the application decides
    let registry = match Registry::new(config) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("logging setup failed: {}", e);
            std::process::exit(1);
        }
    };

    let app = registry.get_handle("app");
    let db = registry.get_handle("db");

    println!("1. Logging to console (Warn+) and file (Debug+):");
    app.info("Application started");
    db.debug("Loading configuration...");
    db.info_with("Connected", LogContext::new().with_field("pool_size", 8));
    app.warn("Using default settings for some options");
    app.error("Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        info!(app, "Processing item {}/5", i);
        if i == 3 {
            warn!(app, "Item {} took longer than expected", i);
        }
    }

    let metrics = registry.metrics();
    println!(
        "\nEmitted {} records, {} deliveries written, {} filtered",
        metrics.records_emitted(),
        metrics.deliveries_written(),
        metrics.deliveries_filtered()
    );
    println!("Check logs/application.log for the complete log.");
}
