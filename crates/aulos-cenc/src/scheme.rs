#![forbid(unsafe_code)]

use std::fmt;

use crate::CipherMode;

const CENC_TAG: u32 = 0x6365_6e63;
const CENS_TAG: u32 = 0x6365_6e73;
const CBC1_TAG: u32 = 0x6362_6331;
const CBCS_TAG: u32 = 0x6362_6373;

/// Protection scheme carried in the container.
///
/// On the wire a scheme is a four-character code interpreted as a
/// big-endian 32-bit tag. The scheme selects the cipher mode, whether a
/// crypt/skip pattern may apply, and how the IV advances across subsamples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncryptionScheme {
    /// AES-CTR, no pattern.
    Cenc,
    /// AES-CTR with a crypt/skip pattern.
    Cens,
    /// AES-CBC, no pattern; each subsample chains from the previous one's
    /// final ciphertext block.
    Cbc1,
    /// AES-CBC with a crypt/skip pattern and a constant IV.
    Cbcs,
}

impl EncryptionScheme {
    /// Classify a wire tag. Unknown tags return `None`.
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            CENC_TAG => Some(Self::Cenc),
            CENS_TAG => Some(Self::Cens),
            CBC1_TAG => Some(Self::Cbc1),
            CBCS_TAG => Some(Self::Cbcs),
            _ => None,
        }
    }

    /// The big-endian wire tag for this scheme.
    pub fn tag(self) -> u32 {
        match self {
            Self::Cenc => CENC_TAG,
            Self::Cens => CENS_TAG,
            Self::Cbc1 => CBC1_TAG,
            Self::Cbcs => CBCS_TAG,
        }
    }

    /// The cipher mode a CDM runs for this scheme.
    pub fn cipher_mode(self) -> CipherMode {
        match self {
            Self::Cenc | Self::Cens => CipherMode::AesCtr,
            Self::Cbc1 | Self::Cbcs => CipherMode::AesCbc,
        }
    }

    /// Whether the container may carry a non-zero crypt/skip pattern.
    pub fn allows_pattern(self) -> bool {
        matches!(self, Self::Cens | Self::Cbcs)
    }
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::Cenc => "cenc",
            Self::Cens => "cens",
            Self::Cbc1 => "cbc1",
            Self::Cbcs => "cbcs",
        };
        f.write_str(code)
    }
}
