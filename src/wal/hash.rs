//! Integrity oracle
//!
//! SHA-256 over `offset_le ++ payload`. Used to tell a fully persisted log
//! record from a torn one; it makes no security claims.

use sha2::{Digest, Sha256};

/// Size of a record digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// Compute the digest of a byte buffer
pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(data).into()
}

/// Check `data` against an expected digest
///
/// An `expected` slice of the wrong width never verifies.
pub fn verify(expected: &[u8], data: &[u8]) -> bool {
    expected.len() == DIGEST_SIZE && digest(data).as_slice() == expected
}
