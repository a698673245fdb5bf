//! Blake2b-512 checksum over a byte range (spec §4.2, C3).
//!
//! Grounded on `aztec_common/checksum.hpp`: a single `blake2b` call over the
//! buffer, with the 64-byte digest appended verbatim and compared byte for
//! byte on read.

use blake2::{Blake2b512, Digest};

use crate::error::{CoreError, CoreResult};

pub const DIGEST_LENGTH: usize = 64;

/// Computes the Blake2b-512 digest of `message`.
pub fn create(message: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Blake2b512::new();
    hasher.update(message);
    let digest = hasher.finalize();
    let mut out = [0u8; DIGEST_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// Recomputes the digest over `buffer[0..message_length]` and compares it
/// byte for byte against the trailing `DIGEST_LENGTH` bytes. Fails with
/// `ChecksumMismatch` on any difference.
pub fn validate(buffer: &[u8], message_length: usize, path: &std::path::Path) -> CoreResult<()> {
    let expected = &buffer[message_length..message_length + DIGEST_LENGTH];
    let actual = create(&buffer[..message_length]);
    if actual.as_slice() != expected {
        return Err(CoreError::ChecksumMismatch {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_matching_digest() {
        let mut buffer = b"hello ceremony".to_vec();
        let digest = create(&buffer);
        buffer.extend_from_slice(&digest);
        assert!(validate(&buffer, buffer.len() - DIGEST_LENGTH, std::path::Path::new("t")).is_ok());
    }

    #[test]
    fn validate_rejects_corrupted_payload() {
        let mut buffer = b"hello ceremony".to_vec();
        let digest = create(&buffer);
        buffer.extend_from_slice(&digest);
        buffer[3] ^= 0xFF;
        assert!(matches!(
            validate(&buffer, buffer.len() - DIGEST_LENGTH, std::path::Path::new("t")),
            Err(CoreError::ChecksumMismatch { .. })
        ));
    }
}
