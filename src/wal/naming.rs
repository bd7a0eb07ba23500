//! Log file naming
//!
//! Log records live next to their target file and are named
//! `<stem>-log-<token>.alog`, where `<stem>` is the target's file name cut
//! at its first `.` and `<token>` is six random alphanumeric characters.
//!
//! Targets that share a stem (`data.db`, `data.idx`) share a log namespace,
//! so only one of them may have a pending operation at a time. Target names
//! must be valid UTF-8.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AtomicError, Result};

/// Fixed infix between the target stem and the unique token
pub const LOG_INFIX: &str = "-log-";

/// Fixed extension of every log file
pub const LOG_EXTENSION: &str = ".alog";

/// Length of the random token between infix and extension
pub const LOG_TOKEN_LEN: usize = 6;

/// Naming scheme for one target file, computed once at open time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNaming {
    /// Directory holding the target and its log files
    dir: PathBuf,

    /// `<stem>-log-`
    prefix: String,
}

impl LogNaming {
    /// Derive the naming scheme from a target path
    ///
    /// `dir` should already be absolute so later lookups do not depend on
    /// the working directory.
    pub fn new(dir: impl Into<PathBuf>, target: &Path) -> Result<Self> {
        let file_name = target
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AtomicError::InvalidPath(target.to_path_buf()))?;

        let stem = match file_name.find('.') {
            Some(dot) => &file_name[..dot],
            None => file_name,
        };

        Ok(Self {
            dir: dir.into(),
            prefix: format!("{stem}{LOG_INFIX}"),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name prefix handed to the temp-file writer
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// File name suffix handed to the temp-file writer
    pub fn suffix(&self) -> &str {
        LOG_EXTENSION
    }

    /// Glob pattern matching every log file of this target
    pub fn pattern(&self) -> String {
        format!("{}*{}", self.prefix, LOG_EXTENSION)
    }

    /// Whether `file_name` is a log file of this target
    ///
    /// The token must be exactly `LOG_TOKEN_LEN` alphanumerics, so target
    /// `a` does not claim `a-log-x-log-XXXXXX.alog`, which belongs to
    /// `a-log-x`.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(LOG_EXTENSION))
            .is_some_and(|token| {
                token.len() == LOG_TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
            })
    }

    /// All log files of this target, sorted by name
    pub fn find_logs(&self) -> Result<Vec<PathBuf>> {
        let mut logs = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };

            if self.matches(name) && entry.file_type()?.is_file() {
                logs.push(entry.path());
            }
        }

        logs.sort();
        Ok(logs)
    }
}
