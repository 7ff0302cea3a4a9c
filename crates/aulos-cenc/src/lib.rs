#![forbid(unsafe_code)]

//! Common Encryption (ISO/IEC 23001-7) subsample decryption core.
//!
//! Given a packet's decoded encryption metadata ([`EncryptionInfo`]), the
//! walker copies clear byte ranges through, dispatches protected ranges to a
//! [`Cdm`], and advances initialization-vector state between subsamples
//! according to the protection scheme (`cenc`, `cens`, `cbc1`, `cbcs`).
//!
//! The crate holds no keys and runs no ciphers itself; the [`Cdm`] trait is
//! the seam to whatever module actually performs the AES work.

mod cdm;
mod error;
mod info;
pub mod iv;
mod scheme;
mod walker;

pub use cdm::{Cdm, CdmError, CipherMode, EncryptionPattern};
pub use error::{DecryptError, DecryptResult};
pub use info::{EncryptionInfo, SubsampleEntry};
pub use scheme::EncryptionScheme;
pub use walker::walk_subsamples;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;
