//! atomicf CLI
//!
//! Command-line access to crash-safe writes and log recovery.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;

use atomicf::wal::{self, Decoded, LogRecord};
use atomicf::{AtomicFile, Config, CorruptLogPolicy, Recovery};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// atomicf CLI
#[derive(Parser, Debug)]
#[command(name = "atomicf")]
#[command(about = "Crash-consistent writes to a single file")]
#[command(version)]
struct Args {
    /// Fail instead of discarding a full-length log record with a bad digest
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay or discard a leftover log record
    Recover {
        /// Target file
        path: PathBuf,
    },

    /// Append data to the end of a file
    Write {
        /// Target file (created if missing)
        path: PathBuf,

        /// Data to append
        data: String,
    },

    /// Write data at a byte offset
    WriteAt {
        /// Target file (created if missing)
        path: PathBuf,

        /// Byte offset
        offset: u64,

        /// Data to write
        data: String,
    },

    /// Decode a log file without touching its target
    Inspect {
        /// Log file (`<stem>-log-<token>.alog`)
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atomicf=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> atomicf::Result<()> {
    let policy = if args.strict {
        CorruptLogPolicy::Fail
    } else {
        CorruptLogPolicy::Discard
    };
    let config = Config::builder().corrupt_log_policy(policy).build();

    let mut options = OpenOptions::new();
    options.create(true).write(true);

    match args.command {
        Commands::Recover { path } => {
            let mut file = AtomicFile::open_with_config(&path, &options, config)?;
            match file.recover()? {
                Recovery::Clean => println!("clean"),
                Recovery::Replayed { offset, len } => {
                    println!("replayed {} bytes at offset {}", len, offset)
                }
                Recovery::Discarded { reason } => println!("discarded ({:?})", reason),
            }
            file.close()
        }
        Commands::Write { path, data } => {
            // Always recover first: a previous run may have been interrupted
            let config = Config { recover_on_open: true, ..config };
            let mut file = AtomicFile::open_with_config(&path, &options, config)?;
            let n = file.write(data.as_bytes())?;
            println!("wrote {} bytes", n);
            file.close()
        }
        Commands::WriteAt { path, offset, data } => {
            let config = Config { recover_on_open: true, ..config };
            let mut file = AtomicFile::open_with_config(&path, &options, config)?;
            let n = file.write_at(data.as_bytes(), offset)?;
            println!("wrote {} bytes at offset {}", n, offset);
            file.close()
        }
        Commands::Inspect { log } => {
            let bytes = fs::read(&log)?;
            match LogRecord::decode(&bytes) {
                Decoded::Valid(record) => {
                    println!("valid: offset={} payload={} bytes", record.offset, record.payload.len())
                }
                Decoded::Torn => println!(
                    "torn: {} bytes, minimum is {}",
                    bytes.len(),
                    wal::MIN_RECORD_SIZE
                ),
                Decoded::Mismatch => println!("digest mismatch: {} bytes", bytes.len()),
            }
            Ok(())
        }
    }
}
