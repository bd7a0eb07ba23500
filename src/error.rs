//! Error types for atomicf
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using AtomicError
pub type Result<T> = std::result::Result<T, AtomicError>;

/// Unified error type for atomicf operations
#[derive(Debug, Error)]
pub enum AtomicError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The log file accepted fewer bytes than requested, so the record
    /// was never fully persisted.
    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    /// A full-length log record failed its digest check. Only returned
    /// under `CorruptLogPolicy::Fail`; the record is left on disk.
    #[error("Log record corrupted: {} ({len} bytes)", path.display())]
    CorruptLog { path: PathBuf, len: usize },

    // -------------------------------------------------------------------------
    // Path Errors
    // -------------------------------------------------------------------------
    /// The target path has no file name to derive log names from
    #[error("Invalid target path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl From<AtomicError> for std::io::Error {
    fn from(err: AtomicError) -> Self {
        use std::io::{Error, ErrorKind};

        match err {
            AtomicError::Io(e) => e,
            AtomicError::ShortWrite { .. } => Error::new(ErrorKind::WriteZero, err),
            AtomicError::CorruptLog { .. } => Error::new(ErrorKind::InvalidData, err),
            AtomicError::InvalidPath(_) => Error::new(ErrorKind::InvalidInput, err),
        }
    }
}
