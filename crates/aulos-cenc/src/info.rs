#![forbid(unsafe_code)]

use bytes::Bytes;

use crate::{AES_BLOCK_SIZE, EncryptionPattern, EncryptionScheme};

/// One clear/protected byte-range pair within a single frame.
///
/// Frames commonly interleave clear codec headers with encrypted payload
/// slices. Either half of a pair may be zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubsampleEntry {
    pub clear_bytes: u32,
    pub protected_bytes: u32,
}

impl SubsampleEntry {
    pub fn new(clear_bytes: u32, protected_bytes: u32) -> Self {
        Self {
            clear_bytes,
            protected_bytes,
        }
    }
}

/// Decoded common-encryption metadata for one packet.
///
/// `scheme_tag` is kept raw rather than pre-classified: an unknown scheme
/// is a supportedness question for the caller, not a parse failure.
///
/// An empty subsample table means whole-payload encryption and is distinct
/// from a one-entry table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncryptionInfo {
    /// Big-endian four-character scheme tag as found in the container.
    pub scheme_tag: u32,
    /// Pattern fields; both zero when no pattern applies.
    pub crypt_byte_block: u32,
    pub skip_byte_block: u32,
    /// Opaque key identifier, typically 16 bytes.
    pub key_id: Bytes,
    /// Initialization vector, 8 or 16 bytes.
    pub iv: Bytes,
    /// Subsample table; empty means whole-payload encryption.
    pub subsamples: Vec<SubsampleEntry>,
}

impl EncryptionInfo {
    pub fn new(scheme: EncryptionScheme, key_id: Bytes, iv: Bytes) -> Self {
        Self {
            scheme_tag: scheme.tag(),
            key_id,
            iv,
            ..Self::default()
        }
    }

    /// Set the crypt/skip pattern fields.
    pub fn with_pattern(mut self, crypt_byte_block: u32, skip_byte_block: u32) -> Self {
        self.crypt_byte_block = crypt_byte_block;
        self.skip_byte_block = skip_byte_block;
        self
    }

    /// Set the subsample table.
    pub fn with_subsamples(mut self, subsamples: Vec<SubsampleEntry>) -> Self {
        self.subsamples = subsamples;
        self
    }

    /// Classified scheme, if the tag is one of the four known schemes.
    pub fn scheme(&self) -> Option<EncryptionScheme> {
        EncryptionScheme::from_tag(self.scheme_tag)
    }

    pub fn pattern(&self) -> EncryptionPattern {
        EncryptionPattern::new(self.crypt_byte_block, self.skip_byte_block)
    }

    /// The IV zero-padded on the right to a full AES block.
    ///
    /// An 8-byte IV occupies the nonce half; the counter half starts at
    /// zero and the counter semantics are unchanged.
    pub fn iv_block(&self) -> [u8; 16] {
        let mut block = [0u8; 16];
        let len = self.iv.len().min(AES_BLOCK_SIZE);
        block[..len].copy_from_slice(&self.iv[..len]);
        block
    }
}
