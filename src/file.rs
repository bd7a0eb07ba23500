//! Atomic File Module
//!
//! Crash-consistent positioned writes to a single file.
//!
//! ## Protocol (per operation)
//! ```text
//! IDLE ──log──▶ LOGGED ──apply──▶ APPLIED ──clean──▶ IDLE
//!
//! log:   write record to <stem>-log-<token>.alog, fsync it, fsync dir
//! apply: write payload at offset, fsync target
//! clean: remove record, fsync dir
//! ```
//! A crash before the first directory sync leaves at most a torn record,
//! which fails its digest and is discarded. A crash after it leaves a valid
//! record, which `recover()` replays. The record is only removed once the
//! target write is durable.
//!
//! ## Concurrency
//! None. One writer per target file; callers must exclude concurrent
//! writers themselves. `write` reads the file size and then writes, which
//! is only an append while nobody else changes the size.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{Config, CorruptLogPolicy};
use crate::error::{AtomicError, Result};
use crate::wal::{self, Decoded, LogNaming, LogRecord};

/// Outcome of `AtomicFile::recover`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// No log record was present
    Clean,

    /// A valid record was found and reapplied to the target
    Replayed { offset: u64, len: usize },

    /// A record was found but not trusted, and was deleted
    Discarded { reason: DiscardReason },
}

/// Why a leftover record was not replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Shorter than a digest plus an offset
    Torn,

    /// Full length, but the digest did not match
    DigestMismatch,
}

/// A file whose writes survive crashes at any point
///
/// Every write is first persisted as a log record next to the target; see
/// the module docs for the exact ordering.
pub struct AtomicFile {
    /// Target file handle
    file: File,

    /// Absolute path of the target
    path: PathBuf,

    /// Log naming, including the absolute directory
    naming: LogNaming,

    config: Config,
}

impl AtomicFile {
    /// Open the target with default config
    ///
    /// Append mode is rejected on Unix: positioned writes and replays seek
    /// before writing, which the OS ignores for `O_APPEND` handles.
    pub fn open(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        Self::open_with_config(path, options, Config::default())
    }

    /// Open the target with the given config
    ///
    /// The directory is resolved to an absolute path once, here, so a later
    /// change of working directory does not move where logs are looked for.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        options: &OpenOptions,
        config: Config,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .filter(|name| name.to_str().is_some())
            .ok_or_else(|| AtomicError::InvalidPath(path.to_path_buf()))?;

        // Step 1: Open the target
        let file = options.open(path)?;
        reject_append_mode(&file, path)?;

        // Step 2: Pin the directory and naming scheme
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dir = fs::canonicalize(dir)?;
        let naming = LogNaming::new(dir.clone(), path)?;

        let mut atomic = Self {
            file,
            path: dir.join(file_name),
            naming,
            config,
        };

        // Step 3: Resolve any interrupted operation
        if atomic.config.recover_on_open {
            atomic.recover()?;
        }

        Ok(atomic)
    }

    /// Append `payload` at the current end of file
    ///
    /// The offset is the file size observed at the start of the call.
    pub fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let offset = self.file.metadata()?.len();
        self.write_logged(payload, offset)
    }

    /// Write `payload` at `offset`
    pub fn write_at(&mut self, payload: &[u8], offset: u64) -> Result<usize> {
        self.write_logged(payload, offset)
    }

    /// Replay or discard a record left by an interrupted operation
    ///
    /// Only the first log file (by name) is processed. Running this twice is
    /// harmless: a handled record no longer exists on the second run.
    pub fn recover(&mut self) -> Result<Recovery> {
        let logs = self.naming.find_logs()?;
        let Some(log_path) = logs.first() else {
            return Ok(Recovery::Clean);
        };

        if logs.len() > 1 {
            warn!(
                found = logs.len(),
                pattern = %self.naming.pattern(),
                "multiple log files found, recovering only the first"
            );
        }

        let data = fs::read(log_path)?;

        match LogRecord::decode(&data) {
            Decoded::Valid(record) => {
                self.apply(log_path, record.offset, &record.payload)?;
                info!(
                    path = %self.path.display(),
                    offset = record.offset,
                    len = record.payload.len(),
                    "replayed interrupted write"
                );
                Ok(Recovery::Replayed {
                    offset: record.offset,
                    len: record.payload.len(),
                })
            }
            Decoded::Torn => self.discard(log_path, DiscardReason::Torn, data.len()),
            Decoded::Mismatch => match self.config.corrupt_log_policy {
                CorruptLogPolicy::Discard => {
                    self.discard(log_path, DiscardReason::DigestMismatch, data.len())
                }
                CorruptLogPolicy::Fail => Err(AtomicError::CorruptLog {
                    path: log_path.clone(),
                    len: data.len(),
                }),
            },
        }
    }

    /// Whether a log record for this file currently exists
    pub fn has_pending_log(&self) -> Result<bool> {
        Ok(!self.naming.find_logs()?.is_empty())
    }

    /// Sync and close the target, surfacing any final I/O error
    pub fn close(self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Absolute path of the target
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute directory holding the target and its logs
    pub fn dir(&self) -> &Path {
        self.naming.dir()
    }

    pub fn naming(&self) -> &LogNaming {
        &self.naming
    }

    pub fn metadata(&self) -> Result<Metadata> {
        Ok(self.file.metadata()?)
    }

    /// Current size of the target in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Underlying handle. Writing through it bypasses the log.
    pub fn get_ref(&self) -> &File {
        &self.file
    }

    pub fn into_inner(self) -> File {
        self.file
    }

    // =========================================================================
    // Protocol
    // =========================================================================

    fn write_logged(&mut self, payload: &[u8], offset: u64) -> Result<usize> {
        // A record the target cannot seek to would be replayed and fail forever
        check_range(offset, payload.len())?;

        let log_path = self.log_operation(payload, offset)?;
        self.apply(&log_path, offset, payload)
    }

    /// IDLE → LOGGED: persist the record and commit its directory entry
    fn log_operation(&self, payload: &[u8], offset: u64) -> Result<PathBuf> {
        let record = LogRecord::new(offset, payload);
        let log_path = wal::write_temp_file(
            self.naming.dir(),
            self.naming.prefix(),
            self.naming.suffix(),
            &record.encode(),
        )?;
        self.sync_dir()?;

        debug!(log = %log_path.display(), offset, len = payload.len(), "operation logged");
        Ok(log_path)
    }

    /// LOGGED → APPLIED → CLEAN
    ///
    /// The record is removed only after the target fsync succeeds, and its
    /// removal is committed with a directory sync.
    fn apply(&mut self, log_path: &Path, offset: u64, payload: &[u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(payload)?;
        self.file.sync_all()?;
        debug!(path = %self.path.display(), offset, len = payload.len(), "operation applied");

        fs::remove_file(log_path)?;
        self.sync_dir()?;
        debug!(log = %log_path.display(), "log removed");

        Ok(payload.len())
    }

    fn discard(&self, log_path: &Path, reason: DiscardReason, len: usize) -> Result<Recovery> {
        fs::remove_file(log_path)?;
        self.sync_dir()?;

        warn!(
            log = %log_path.display(),
            len,
            ?reason,
            "discarded log record without replaying it"
        );
        Ok(Recovery::Discarded { reason })
    }

    fn sync_dir(&self) -> Result<()> {
        if self.config.sync_directory {
            wal::sync_dir(self.naming.dir())?;
        }
        Ok(())
    }
}

/// `offset + len` must fit in a signed 64-bit file position
fn check_range(offset: u64, len: usize) -> Result<()> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= i64::MAX as u64 => Ok(()),
        _ => Err(AtomicError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("write of {} bytes at offset {} is past the maximum file size", len, offset),
        ))),
    }
}

#[cfg(unix)]
fn reject_append_mode(file: &File, path: &Path) -> Result<()> {
    use rustix::fs::{fcntl_getfl, OFlags};

    let flags = fcntl_getfl(file).map_err(io::Error::from)?;
    if flags.contains(OFlags::APPEND) {
        return Err(AtomicError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is opened in append mode", path.display()),
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn reject_append_mode(_file: &File, _path: &Path) -> Result<()> {
    Ok(())
}

impl std::fmt::Debug for AtomicFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicFile")
            .field("path", &self.path)
            .field("pattern", &self.naming.pattern())
            .finish()
    }
}

/// Each `write` call is one logged append; `flush` fsyncs the target.
impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        AtomicFile::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}
