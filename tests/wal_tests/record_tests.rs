//! Tests for the log record codec
//!
//! These tests verify:
//! - The byte-exact on-disk layout
//! - Digest mismatch detection
//! - Short buffers are classified as torn, never decoded

use atomicf::wal::{digest, Decoded, LogRecord, DIGEST_SIZE, MIN_RECORD_SIZE, OFFSET_SIZE};

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_encode_layout_is_digest_offset_payload() {
    let record = LogRecord::new(2, vec![8, 9]);
    let bytes = record.encode();

    let mut body = 2u64.to_le_bytes().to_vec();
    body.extend_from_slice(&[8, 9]);

    assert_eq!(bytes.len(), DIGEST_SIZE + OFFSET_SIZE + 2);
    assert_eq!(&bytes[..DIGEST_SIZE], &digest(&body));
    assert_eq!(&bytes[DIGEST_SIZE..DIGEST_SIZE + OFFSET_SIZE], &2u64.to_le_bytes());
    assert_eq!(&bytes[MIN_RECORD_SIZE..], &[8, 9]);
    assert_eq!(record.encoded_len(), bytes.len());
}

#[test]
fn test_decode_hand_built_record() {
    // Built by hand, independent of encode()
    let mut body = 0x0102_0304_0506_0708u64.to_le_bytes().to_vec();
    body.extend_from_slice(b"payload");
    let mut bytes = digest(&body).to_vec();
    bytes.extend_from_slice(&body);

    match LogRecord::decode(&bytes) {
        Decoded::Valid(record) => {
            assert_eq!(record.offset, 0x0102_0304_0506_0708);
            assert_eq!(record.payload, b"payload");
        }
        other => panic!("expected valid record, got {:?}", other),
    }
}

#[test]
fn test_empty_payload_is_valid() {
    let bytes = LogRecord::new(u64::MAX, Vec::new()).encode();
    assert_eq!(bytes.len(), MIN_RECORD_SIZE);
    assert_eq!(
        LogRecord::decode(&bytes),
        Decoded::Valid(LogRecord::new(u64::MAX, Vec::new()))
    );
}

// =============================================================================
// Torn / Corrupt Tests
// =============================================================================

#[test]
fn test_empty_buffer_is_torn() {
    assert_eq!(LogRecord::decode(&[]), Decoded::Torn);
}

#[test]
fn test_buffer_shorter_than_digest_is_torn() {
    let bytes = LogRecord::new(2, vec![8, 9]).encode();
    assert_eq!(LogRecord::decode(&bytes[..DIGEST_SIZE - 1]), Decoded::Torn);
}

#[test]
fn test_buffer_missing_offset_bytes_is_torn() {
    let bytes = LogRecord::new(2, vec![8, 9]).encode();
    assert_eq!(LogRecord::decode(&bytes[..MIN_RECORD_SIZE - 1]), Decoded::Torn);
}

#[test]
fn test_truncated_payload_is_mismatch() {
    let bytes = LogRecord::new(2, vec![8, 9, 10, 11]).encode();
    assert_eq!(LogRecord::decode(&bytes[..bytes.len() - 1]), Decoded::Mismatch);
}

#[test]
fn test_flipped_payload_bit_is_mismatch() {
    let mut bytes = LogRecord::new(2, vec![8, 9]).encode();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    assert_eq!(LogRecord::decode(&bytes), Decoded::Mismatch);
}

#[test]
fn test_flipped_offset_bit_is_mismatch() {
    let mut bytes = LogRecord::new(2, vec![8, 9]).encode();
    bytes[DIGEST_SIZE] ^= 0x80;
    assert_eq!(LogRecord::decode(&bytes), Decoded::Mismatch);
}

#[test]
fn test_flipped_digest_bit_is_mismatch() {
    let mut bytes = LogRecord::new(2, vec![8, 9]).encode();
    bytes[0] ^= 0xFF;
    assert_eq!(LogRecord::decode(&bytes), Decoded::Mismatch);
}

// =============================================================================
// Large Payload Tests
// =============================================================================

#[test]
fn test_large_payload() {
    let payload: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
    let bytes = LogRecord::new(4096, payload.clone()).encode();

    assert_eq!(
        LogRecord::decode(&bytes),
        Decoded::Valid(LogRecord::new(4096, payload))
    );
}
