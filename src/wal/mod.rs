//! Write-Ahead Log (WAL) Module
//!
//! Each pending write is persisted as its own small log file before the
//! target file is touched.
//!
//! ## Responsibilities
//! - Encode and decode log records
//! - SHA-256 digests for torn-write detection
//! - Naming and locating the log files of a target
//! - Durably writing log files
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ <stem>-log-<token>.alog                 │
//! │ ┌────────────┬────────────┬───────────┐ │
//! │ │ SHA256(32) │ Offset (8) │ Payload   │ │
//! │ └────────────┴────────────┴───────────┘ │
//! └─────────────────────────────────────────┘
//! ```

mod hash;
mod naming;
mod record;
mod writer;

pub use hash::{digest, verify, DIGEST_SIZE};
pub use naming::{LogNaming, LOG_EXTENSION, LOG_INFIX, LOG_TOKEN_LEN};
pub use record::{Decoded, LogRecord, MIN_RECORD_SIZE, OFFSET_SIZE};
pub use writer::{sync_dir, write_temp_file};
