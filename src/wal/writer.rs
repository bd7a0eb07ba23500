//! Log file writer
//!
//! Materializes a log record as its own uniquely named file and makes its
//! contents durable. Syncing the containing directory is left to the
//! caller, which owns the larger operation boundary.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

use super::naming::LOG_TOKEN_LEN;
use crate::error::{AtomicError, Result};

/// Create `<prefix><token><suffix>` in `dir`, write `data`, fsync and close it
///
/// Returns the resolved path. If anything fails before the file is kept,
/// the partial file is removed.
pub fn write_temp_file(dir: &Path, prefix: &str, suffix: &str, data: &[u8]) -> Result<PathBuf> {
    let mut tmp = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .rand_bytes(LOG_TOKEN_LEN)
        .tempfile_in(dir)?;

    write_fully(tmp.as_file_mut(), data)?;
    tmp.as_file().sync_all()?;

    let (file, path) = tmp.keep().map_err(|e| AtomicError::Io(e.error))?;
    drop(file);

    trace!(path = %path.display(), bytes = data.len(), "log file persisted");
    Ok(path)
}

/// Like `write_all`, but a write that makes no progress is a `ShortWrite`
fn write_fully<W: Write>(out: &mut W, data: &[u8]) -> Result<()> {
    let mut written = 0;

    while written < data.len() {
        match out.write(&data[written..]) {
            Ok(0) => {
                return Err(AtomicError::ShortWrite {
                    written,
                    expected: data.len(),
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// fsync a directory so entry creations and removals in it are durable
///
/// The handle is opened for this call only and closed on every path.
#[cfg(unix)]
pub fn sync_dir(dir: &Path) -> Result<()> {
    let handle = std::fs::File::open(dir)?;
    handle.sync_all()?;
    Ok(())
}

/// Directories cannot be opened as files here; entry durability is left to
/// the filesystem.
#[cfg(not(unix))]
pub fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
