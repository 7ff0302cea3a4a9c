#![forbid(unsafe_code)]

use thiserror::Error;

use crate::CdmError;

/// Frame decryption errors surfaced to the caller.
///
/// Errors propagate unchanged: the core never retries and never continues
/// past a failed subsample. On any error the destination buffer contents
/// are unspecified.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecryptError {
    #[error("encryption scheme or pattern not supported")]
    NotSupported,

    #[error("no key available for the supplied key id")]
    KeyNotFound,

    #[error("invalid container data")]
    InvalidContainerData,

    #[error("out of memory")]
    OutOfMemory,

    #[error("unknown decryption error")]
    Unknown,
}

impl From<CdmError> for DecryptError {
    fn from(err: CdmError) -> Self {
        match err {
            CdmError::NotSupported => Self::NotSupported,
            CdmError::KeyNotFound => Self::KeyNotFound,
            CdmError::Other(_) => Self::Unknown,
        }
    }
}

pub type DecryptResult<T> = Result<T, DecryptError>;
