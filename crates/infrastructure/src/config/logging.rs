//! Log sink configuration: console verbosity and the rotating JSON file.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;
use crate::logging::RotationPolicy;

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Console and file logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Active log file; rotated files are written next to it
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Size at which the active file is rotated, in megabytes
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,

    /// Rotated files to keep (0 = unlimited)
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Age after which rotated files are removed, in days (0 = unlimited)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// Gzip rotated files
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Minimum level for the console sink
    #[serde(default = "default_console_level")]
    pub console_level: String,

    /// Minimum level for the file sink
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_file_path() -> PathBuf {
    PathBuf::from("../log/app.log")
}

const fn default_max_size_mb() -> u64 {
    100
}

const fn default_max_backups() -> usize {
    7
}

const fn default_max_age_days() -> u64 {
    30
}

fn default_console_level() -> String {
    "debug".to_string()
}

fn default_file_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Rotation limits for the file sink
    #[must_use]
    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_size_bytes: self.max_size_mb.saturating_mul(BYTES_PER_MB),
            max_backups: self.max_backups,
            max_age: (self.max_age_days > 0)
                .then(|| Duration::from_secs(self.max_age_days.saturating_mul(SECS_PER_DAY))),
            compress: self.compress,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            max_size_mb: default_max_size_mb(),
            max_backups: default_max_backups(),
            max_age_days: default_max_age_days(),
            compress: true,
            console_level: default_console_level(),
            file_level: default_file_level(),
        }
    }
}
