//! # atomicf
//!
//! Crash-consistent random-access writes to a single file:
//! - Write-ahead log record per operation, persisted before the target
//!   is touched
//! - SHA-256 digest to tell torn log writes from complete ones
//! - Recovery that replays or discards a leftover record
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AtomicFile                            │
//! │        write / write_at / recover  (single writer)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  WAL record │          │ Target file │
//!   │  (.alog)    │          │ (pwrite +   │
//!   │  + dir sync │          │   fsync)    │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::OpenOptions;
//! use atomicf::AtomicFile;
//!
//! # fn main() -> atomicf::Result<()> {
//! let mut options = OpenOptions::new();
//! options.create(true).write(true);
//!
//! let mut file = AtomicFile::open("data.bin", &options)?;
//! file.recover()?;
//! file.write(b"hello")?;
//! file.write_at(b"J", 0)?;
//! file.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod file;
pub mod wal;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, CorruptLogPolicy};
pub use error::{AtomicError, Result};
pub use file::{AtomicFile, DiscardReason, Recovery};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of atomicf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
