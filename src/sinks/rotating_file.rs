//! Rotating file sink
//!
//! Appends rendered lines to a file and rotates it once a size or time
//! threshold is crossed. Backups live next to the active file as
//! `{path}.1` (newest) through `{path}.N`, with a `.gz` suffix when
//! compression is enabled. After every rotation old backups are pruned:
//! first by age, then by count.

use crate::core::{FileConfig, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Size limit used when the configuration leaves it at zero
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const MEGABYTE: u64 = 1024 * 1024;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Rotation strategy defining when to rotate log files
///
/// # Examples
///
/// ```
/// use rust_logs::sinks::RotationStrategy;
/// use std::time::Duration;
///
/// // Rotate when file exceeds 100 MB
/// let size_strategy = RotationStrategy::size(100 * 1024 * 1024);
///
/// // Rotate on size OR time, whichever comes first
/// let hybrid_strategy = RotationStrategy::hybrid(50 * 1024 * 1024, Duration::from_secs(24 * 3600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RotationStrategy {
    /// Rotate when file reaches size in bytes
    Size { max_bytes: u64 },

    /// Rotate once the active file has been open for `interval`
    Time { interval: Duration },

    /// Rotate on size OR time, whichever comes first
    Hybrid { max_bytes: u64, interval: Duration },

    /// No rotation (useful when external rotation is used)
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
        }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    #[must_use]
    pub fn time(interval: Duration) -> Self {
        RotationStrategy::Time { interval }
    }

    #[must_use]
    pub fn hybrid(max_bytes: u64, interval: Duration) -> Self {
        RotationStrategy::Hybrid { max_bytes, interval }
    }

    #[must_use]
    pub fn never() -> Self {
        RotationStrategy::Never
    }

    fn is_due(&self, size: u64, opened_at: SystemTime) -> bool {
        let elapsed = || {
            SystemTime::now()
                .duration_since(opened_at)
                .unwrap_or(Duration::ZERO)
        };
        match self {
            RotationStrategy::Never => false,
            RotationStrategy::Size { max_bytes } => size >= *max_bytes,
            RotationStrategy::Time { interval } => elapsed() >= *interval,
            RotationStrategy::Hybrid { max_bytes, interval } => {
                size >= *max_bytes || elapsed() >= *interval
            }
        }
    }
}

/// When to rotate and how much history to keep
///
/// # Examples
///
/// ```
/// use rust_logs::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(30 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_file_size(), Some(50 * 1024 * 1024));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Maximum number of backups to keep, 0 keeps all
    pub max_backups: usize,
    /// Backups older than this are deleted
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for `with_strategy(RotationStrategy::Size { max_bytes: size })`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.strategy = RotationStrategy::Size { max_bytes: size };
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Get the maximum file size if the strategy includes one
    #[must_use]
    pub fn max_file_size(&self) -> Option<u64> {
        match &self.strategy {
            RotationStrategy::Size { max_bytes } | RotationStrategy::Hybrid { max_bytes, .. } => {
                Some(*max_bytes)
            }
            _ => None,
        }
    }
}

impl From<&FileConfig> for RotationPolicy {
    fn from(config: &FileConfig) -> Self {
        let max_size_mb = if config.max_size_mb == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            config.max_size_mb
        };
        Self {
            strategy: RotationStrategy::size(max_size_mb.saturating_mul(MEGABYTE)),
            max_backups: config.max_backups,
            max_age: (config.max_age_days > 0)
                .then(|| DAY.saturating_mul(u32::try_from(config.max_age_days).unwrap_or(u32::MAX))),
            compress: config.compress,
        }
    }
}

/// A rotated file next to the active one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub index: usize,
    pub path: PathBuf,
    pub compressed: bool,
}

struct FileState {
    file: Option<File>,
    current_size: u64,
    opened_at: SystemTime,
    rotations: u64,
    /// Size below which no rotation is attempted after a failed one
    retry_at_size: u64,
}

/// File sink with size/time based rotation
///
/// All writes and rotations go through one lock, so lines never interleave
/// and a rotation is atomic with respect to concurrent writers.
///
/// # Examples
///
/// ```no_run
/// use rust_logs::sinks::{RotatingFileSink, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(10 * 1024 * 1024).with_max_backups(5);
/// let sink = RotatingFileSink::with_policy("/var/log/app.log", policy).unwrap();
/// sink.write("service started").unwrap();
/// ```
pub struct RotatingFileSink {
    base_path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    /// Create a sink with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    pub fn from_config(config: &FileConfig) -> Result<Self> {
        Self::with_policy(&config.path, RotationPolicy::from(config))
    }

    /// Create a sink with a custom policy
    ///
    /// Missing parent directories are created and the file is created empty
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileSinkError`] if the file cannot be opened
    /// for appending.
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_sink(
                    base_path.display().to_string(),
                    format!("Failed to create directory '{}': {}", parent.display(), e),
                )
            })?;
        }

        let (file, current_size, opened_at) = Self::open_active(&base_path).map_err(|e| {
            LoggerError::file_sink(base_path.display().to_string(), format!("Failed to open: {}", e))
        })?;

        Ok(Self {
            base_path,
            policy,
            state: Mutex::new(FileState {
                file: Some(file),
                current_size,
                opened_at,
                rotations: 0,
                retry_at_size: 0,
            }),
        })
    }

    fn open_active(path: &Path) -> std::io::Result<(File, u64, SystemTime)> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let metadata = file.metadata()?;
        let opened_at = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        Ok((file, metadata.len(), opened_at))
    }

    /// Append one line (a newline is added) and rotate if a threshold is crossed
    ///
    /// A failed rotation is reported on stderr; the line itself is already
    /// on disk at that point and writing continues with the active file.
    ///
    /// # Errors
    ///
    /// Returns error when the line could not be written.
    pub fn write(&self, line: &str) -> Result<()> {
        let mut state = self.state.lock();

        if state.file.is_none() {
            let (file, size, opened_at) = Self::open_active(&self.base_path).map_err(|e| {
                LoggerError::io_operation(
                    "reopening log file",
                    self.base_path.display().to_string(),
                    e,
                )
            })?;
            state.file = Some(file);
            state.current_size = size;
            state.opened_at = opened_at;
        }

        let mut output = String::with_capacity(line.len() + 1);
        output.push_str(line);
        output.push('\n');

        if let Some(file) = state.file.as_mut() {
            file.write_all(output.as_bytes()).map_err(|e| {
                LoggerError::io_operation(
                    "writing log line",
                    self.base_path.display().to_string(),
                    e,
                )
            })?;
        }
        state.current_size += output.len() as u64;

        if state.current_size >= state.retry_at_size
            && self
                .policy
                .strategy
                .is_due(state.current_size, state.opened_at)
        {
            if let Err(e) = self.rotate_locked(&mut state) {
                eprintln!("[LOGGER WARNING] {}. Continuing with current file.", e);
                self.recover(&mut state);
            }
        }

        Ok(())
    }

    /// Force a rotation regardless of thresholds
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileRotationError`] when the active file could
    /// not be moved aside or reopened.
    pub fn rotate(&self) -> Result<()> {
        let mut state = self.state.lock();
        let result = self.rotate_locked(&mut state);
        if result.is_err() {
            self.recover(&mut state);
        }
        result
    }

    /// Continue after a failed rotation
    ///
    /// When the active file was never moved aside its handle is kept and the
    /// next attempt waits until the file has doubled or a new time interval
    /// has passed. Otherwise the active path is reopened.
    fn recover(&self, state: &mut FileState) {
        if state.file.is_some() {
            state.retry_at_size = state.current_size.saturating_mul(2);
            state.opened_at = SystemTime::now();
            return;
        }
        match Self::open_active(&self.base_path) {
            Ok((file, size, _)) => {
                state.file = Some(file);
                state.current_size = size;
                state.opened_at = SystemTime::now();
                state.retry_at_size = 0;
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to reopen log file after rotation failure: {}", e);
            }
        }
    }

    fn rotate_locked(&self, state: &mut FileState) -> Result<()> {
        if let Some(file) = state.file.as_mut() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        // Shift from the highest index down so no rename overwrites a backup
        let mut backups = self.backups();
        backups.sort_by(|a, b| b.index.cmp(&a.index));
        for backup in &backups {
            let target = self.backup_path(backup.index + 1, backup.compressed);
            fs::rename(&backup.path, &target).map_err(|e| {
                LoggerError::file_rotation(
                    backup.path.display().to_string(),
                    format!("Failed to shift backup: {}", e),
                )
            })?;
        }

        let first_backup = self.backup_path(1, false);
        if self.base_path.exists() {
            fs::rename(&self.base_path, &first_backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to move active file aside: {}", e),
                )
            })?;
        }
        // The old handle points at the backup or at an unlinked file
        state.file = None;

        if self.policy.compress && first_backup.exists() {
            if let Err(e) = self.compress_file(&first_backup) {
                eprintln!("[LOGGER WARNING] Keeping uncompressed backup: {}", e);
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        state.file = Some(file);
        state.current_size = 0;
        state.opened_at = SystemTime::now();
        state.rotations += 1;
        state.retry_at_size = 0;

        self.prune();
        Ok(())
    }

    /// Delete backups beyond the retention limits, returning how many went
    ///
    /// Age pruning runs first; count pruning then removes every backup whose
    /// index exceeds `max_backups`.
    fn prune(&self) -> usize {
        let mut removed = 0;
        let mut backups = self.backups();

        if let Some(max_age) = self.policy.max_age {
            let cutoff = SystemTime::now().checked_sub(max_age);
            backups.retain(|backup| {
                let expired = match (cutoff, fs::metadata(&backup.path).and_then(|m| m.modified())) {
                    (Some(cutoff), Ok(modified)) => modified < cutoff,
                    _ => false,
                };
                if expired && self.remove_backup(backup) {
                    removed += 1;
                    return false;
                }
                true
            });
        }

        if self.policy.max_backups > 0 {
            for backup in backups.iter().filter(|b| b.index > self.policy.max_backups) {
                if self.remove_backup(backup) {
                    removed += 1;
                }
            }
        }

        removed
    }

    fn remove_backup(&self, backup: &Backup) -> bool {
        match fs::remove_file(&backup.path) {
            Ok(()) => true,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
                false
            }
        }
    }

    /// Existing backups ordered by index, newest first
    pub fn backups(&self) -> Vec<Backup> {
        let dir = match self.base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let prefix = format!("{}.", self.file_name());

        let mut backups: Vec<Backup> = fs::read_dir(&dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| {
                        let name = entry.file_name().into_string().ok()?;
                        let suffix = name.strip_prefix(&prefix)?;
                        let (digits, compressed) = match suffix.strip_suffix(".gz") {
                            Some(digits) => (digits, true),
                            None => (suffix, false),
                        };
                        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                            return None;
                        }
                        let index = digits.parse::<usize>().ok().filter(|i| *i > 0)?;
                        Some(Backup {
                            index,
                            path: self.backup_path(index, compressed),
                            compressed,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        backups.sort_by_key(|b| (b.index, b.compressed));
        backups
    }

    fn file_name(&self) -> String {
        self.base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app.log".to_string())
    }

    /// Path of the backup with the given index
    fn backup_path(&self, index: usize, compressed: bool) -> PathBuf {
        let suffix = if compressed { ".gz" } else { "" };
        self.base_path
            .with_file_name(format!("{}.{}{}", self.file_name(), index, suffix))
    }

    /// Gzip `path` into `path.gz`, removing the original only on success
    fn compress_file(&self, path: &Path) -> Result<()> {
        let mut gz_name = path.as_os_str().to_os_string();
        gz_name.push(".gz");
        let gz_path = PathBuf::from(gz_name);
        let mut tmp_name = gz_path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let temp_gz_path = PathBuf::from(tmp_name);

        let compress = || -> std::io::Result<()> {
            let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
            let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_gz_path)?);
            let mut encoder =
                flate2::write::GzEncoder::new(output, flate2::Compression::default());

            let mut buffer = vec![0u8; 64 * 1024];
            loop {
                let bytes_read = reader.read(&mut buffer)?;
                if bytes_read == 0 {
                    break;
                }
                encoder.write_all(&buffer[..bytes_read])?;
            }
            encoder.finish()?.flush()?;
            fs::rename(&temp_gz_path, &gz_path)
        };

        if let Err(e) = compress() {
            let _ = fs::remove_file(&temp_gz_path);
            return Err(LoggerError::io_operation(
                "compressing log backup",
                path.display().to_string(),
                e,
            ));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
                path.display(),
                e
            );
        }
        Ok(())
    }

    /// Bytes written to the active file since it was opened or rotated
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    /// Number of rotations performed by this sink
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.state.lock().rotations
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    pub fn name(&self) -> &str {
        "file"
    }
}
