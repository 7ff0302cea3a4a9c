#![forbid(unsafe_code)]

//! The seam between the walker and a Content Decryption Module.

use thiserror::Error;

/// Cipher mode the CDM runs for a protected region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CipherMode {
    AesCtr,
    AesCbc,
}

/// Crypt/skip pattern in whole 16-byte blocks.
///
/// `(0, 0)` is the "no pattern" sentinel: every protected byte is
/// encrypted. A `1:9` pattern is canonical for `cbcs` video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncryptionPattern {
    pub crypt_byte_block: u32,
    pub skip_byte_block: u32,
}

impl EncryptionPattern {
    pub fn new(crypt_byte_block: u32, skip_byte_block: u32) -> Self {
        Self {
            crypt_byte_block,
            skip_byte_block,
        }
    }

    /// True when both fields are zero and no pattern applies.
    pub fn is_unpatterned(&self) -> bool {
        self.crypt_byte_block == 0 && self.skip_byte_block == 0
    }
}

/// CDM-side decryption failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CdmError {
    #[error("scheme or pattern not supported by the CDM")]
    NotSupported,

    #[error("no key loaded for the requested key id")]
    KeyNotFound,

    #[error("decryption failed: {0}")]
    Other(String),
}

/// A Content Decryption Module.
///
/// One synchronous capability: decrypt `ciphertext` into `plaintext` with
/// the key identified by `key_id`. The two buffers have the same length.
///
/// `block_offset` is the number of bytes into the current AES block already
/// consumed by a previous subsample; it lies in `0..16` and is only
/// meaningful in CTR mode. Blocking inside `decrypt` blocks the calling
/// thread; implementations decide their own thread-safety, and the walker
/// only borrows the CDM for the duration of a single call.
pub trait Cdm {
    #[allow(clippy::too_many_arguments)]
    fn decrypt(
        &self,
        mode: CipherMode,
        pattern: EncryptionPattern,
        block_offset: u32,
        key_id: &[u8],
        iv: &[u8; 16],
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> Result<(), CdmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pattern_is_unpatterned() {
        assert!(EncryptionPattern::default().is_unpatterned());
        assert!(EncryptionPattern::new(0, 0).is_unpatterned());
        assert!(!EncryptionPattern::new(1, 9).is_unpatterned());
        assert!(!EncryptionPattern::new(0, 9).is_unpatterned());
    }
}
