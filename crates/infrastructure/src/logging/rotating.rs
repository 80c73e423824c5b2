//! Size-based rotating file writer
//!
//! The active file keeps its configured name. When a write would push it past
//! the size limit it is renamed to `<stem>-<UTC timestamp>.<ext>`, optionally
//! gzipped to `<stem>-<UTC timestamp>.<ext>.gz`, and a fresh file is opened.
//! Rotated files beyond the backup count or older than the age limit are
//! deleted after every rotation and on open.
//!
//! The writer is synchronous; wrap it in `tracing_appender::non_blocking` so
//! rotation and compression happen on the appender's worker thread.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use flate2::{Compression, write::GzEncoder};

/// Timestamp embedded in rotated file names
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const GZ_SUFFIX: &str = ".gz";

/// Limits applied to the active file and its backups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate before the active file would exceed this size
    pub max_size_bytes: u64,
    /// Backups to keep; 0 keeps all
    pub max_backups: usize,
    /// Delete backups older than this
    pub max_age: Option<Duration>,
    /// Gzip rotated files
    pub compress: bool,
}

/// A log file that rotates itself by size
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    dir: PathBuf,
    stem: String,
    extension: Option<String>,
    policy: RotationPolicy,
    file: File,
    size: u64,
    last_rotation: Option<DateTime<Utc>>,
}

impl RotatingFileWriter {
    /// Open (or create) the active file, appending to existing content
    pub fn open(path: impl AsRef<Path>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("log path {} has no file name", path.display()),
                )
            })?
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);

        let file = open_append(&path)?;
        let size = file.metadata()?.len();

        let writer = Self {
            path,
            dir,
            stem,
            extension,
            policy,
            file,
            size,
            last_rotation: None,
        };
        writer.prune()?;
        Ok(writer)
    }

    /// Path of the active file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently in the active file
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Rotated files with their timestamps, newest first
    pub fn backups(&self) -> io::Result<Vec<(NaiveDateTime, PathBuf)>> {
        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(time) = name.to_str().and_then(|n| self.backup_time(n)) {
                backups.push((time, entry.path()));
            }
        }
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups)
    }

    /// Move the active file aside and start a new one
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let stamp = self.next_backup_time();
        let backup = self.backup_path(stamp);
        fs::rename(&self.path, &backup)?;

        self.file = open_append(&self.path)?;
        self.size = 0;
        self.last_rotation = Some(stamp);

        if self.policy.compress {
            compress(&backup)?;
        }
        self.prune()
    }

    /// A rotation time after the previous one and not used by any backup
    fn next_backup_time(&self) -> DateTime<Utc> {
        let step = TimeDelta::milliseconds(1);
        let mut stamp = Utc::now();
        if let Some(last) = self.last_rotation {
            if stamp <= last {
                stamp = last + step;
            }
        }
        while self.backup_path(stamp).exists() || gz_path(&self.backup_path(stamp)).exists() {
            stamp += step;
        }
        stamp
    }

    fn backup_path(&self, stamp: DateTime<Utc>) -> PathBuf {
        let stamp = stamp.format(BACKUP_TIME_FORMAT);
        let name = match &self.extension {
            Some(ext) => format!("{}-{stamp}.{ext}", self.stem),
            None => format!("{}-{stamp}", self.stem),
        };
        self.dir.join(name)
    }

    /// Timestamp of a rotated file name, `None` for unrelated files
    fn backup_time(&self, file_name: &str) -> Option<NaiveDateTime> {
        let rest = file_name.strip_prefix(&self.stem)?.strip_prefix('-')?;
        let rest = rest.strip_suffix(GZ_SUFFIX).unwrap_or(rest);
        let stamp = match &self.extension {
            Some(ext) => rest.strip_suffix(ext.as_str())?.strip_suffix('.')?,
            None => rest,
        };
        NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
    }

    /// Delete backups over the count limit or past the age limit
    fn prune(&self) -> io::Result<()> {
        let cutoff = self
            .policy
            .max_age
            .and_then(|age| TimeDelta::from_std(age).ok())
            .and_then(|age| Utc::now().naive_utc().checked_sub_signed(age));

        for (index, (time, path)) in self.backups()?.into_iter().enumerate() {
            let over_count = self.policy.max_backups > 0 && index >= self.policy.max_backups;
            let too_old = cutoff.is_some_and(|cutoff| time < cutoff);
            if over_count || too_old {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.size > 0 && self.size.saturating_add(incoming) > self.policy.max_size_bytes {
            self.rotate()?;
        }

        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(GZ_SUFFIX);
    PathBuf::from(name)
}

/// Replace `path` with a gzipped copy next to it
fn compress(path: &Path) -> io::Result<PathBuf> {
    let target = gz_path(path);
    let mut input = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(&target)?, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)?;
    Ok(target)
}
