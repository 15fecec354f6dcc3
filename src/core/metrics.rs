//! Dispatch counters
//!
//! Sink failures never reach callers, so these counters are the way to
//! observe them from the outside.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every handle of a registry
///
/// # Example
///
/// ```
/// use rust_logs::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_written();
/// metrics.record_failed();
///
/// assert_eq!(metrics.records_emitted(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records built by handles
    records_emitted: AtomicU64,

    /// Deliveries that reached a sink
    deliveries_written: AtomicU64,

    /// Deliveries skipped because the record was below a logger's threshold
    deliveries_filtered: AtomicU64,

    /// Deliveries whose sink returned an error or panicked
    deliveries_failed: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_emitted: AtomicU64::new(0),
            deliveries_written: AtomicU64::new(0),
            deliveries_filtered: AtomicU64::new(0),
            deliveries_failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_written(&self) -> u64 {
        self.deliveries_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_filtered(&self) -> u64 {
        self.deliveries_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_failed(&self) -> u64 {
        self.deliveries_failed.load(Ordering::Relaxed)
    }

    /// Record a new record; returns the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.deliveries_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.deliveries_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed deliveries as a percentage of attempted ones (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.deliveries_failed() as f64;
        let attempted = self.deliveries_written() as f64 + failed;
        if attempted == 0.0 {
            0.0
        } else {
            (failed / attempted) * 100.0
        }
    }

    pub fn reset(&self) {
        self.records_emitted.store(0, Ordering::Relaxed);
        self.deliveries_written.store(0, Ordering::Relaxed);
        self.deliveries_filtered.store(0, Ordering::Relaxed);
        self.deliveries_failed.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            records_emitted: AtomicU64::new(self.records_emitted()),
            deliveries_written: AtomicU64::new(self.deliveries_written()),
            deliveries_filtered: AtomicU64::new(self.deliveries_filtered()),
            deliveries_failed: AtomicU64::new(self.deliveries_failed()),
        }
    }
}
