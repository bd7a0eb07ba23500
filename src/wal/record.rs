//! Log record codec
//!
//! A log record describes one pending positioned write.

use super::hash::{digest, verify, DIGEST_SIZE};

/// Size of the little-endian offset field
pub const OFFSET_SIZE: usize = 8;

/// Smallest buffer that can hold a record: digest + offset, empty payload
pub const MIN_RECORD_SIZE: usize = DIGEST_SIZE + OFFSET_SIZE;

/// One pending write: put `payload` at `offset` in the target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Byte offset in the target file
    pub offset: u64,

    /// Bytes to write at `offset`
    pub payload: Vec<u8>,
}

/// Result of decoding a log file's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Digest verified; safe to replay
    Valid(LogRecord),

    /// Too short to hold a digest and an offset
    Torn,

    /// Long enough, but the digest does not match the body
    Mismatch,
}

impl LogRecord {
    pub fn new(offset: u64, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            payload: payload.into(),
        }
    }

    /// Encode to the on-disk layout
    ///
    /// ```text
    /// ┌─────────────┬────────────┬──────────────────┐
    /// │ Digest (32) │ Offset (8) │ Payload          │
    /// └─────────────┴────────────┴──────────────────┘
    /// ```
    /// The digest covers the offset bytes and the payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(OFFSET_SIZE + self.payload.len());
        body.extend_from_slice(&self.offset.to_le_bytes());
        body.extend_from_slice(&self.payload);

        let mut record = Vec::with_capacity(DIGEST_SIZE + body.len());
        record.extend_from_slice(&digest(&body));
        record.extend_from_slice(&body);
        record
    }

    /// Decode a buffer read back from a log file
    pub fn decode(bytes: &[u8]) -> Decoded {
        if bytes.len() < MIN_RECORD_SIZE {
            return Decoded::Torn;
        }

        let (hash, body) = bytes.split_at(DIGEST_SIZE);
        if !verify(hash, body) {
            return Decoded::Mismatch;
        }

        let (offset_bytes, payload) = body.split_at(OFFSET_SIZE);
        let mut offset = [0u8; OFFSET_SIZE];
        offset.copy_from_slice(offset_bytes);

        Decoded::Valid(LogRecord {
            offset: u64::from_le_bytes(offset),
            payload: payload.to_vec(),
        })
    }

    /// Total encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        MIN_RECORD_SIZE + self.payload.len()
    }
}
