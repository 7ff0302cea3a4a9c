#![forbid(unsafe_code)]

//! AES-128 decryption behind the [`Cdm`] seam.

use aes::{
    Aes128,
    cipher::{BlockDecryptMut, KeyIvInit, StreamCipher, StreamCipherSeek},
};
use aulos_cenc::{AES_BLOCK_SIZE, Cdm, CdmError, CipherMode, EncryptionPattern};
use tracing::trace;

use crate::KeyStore;

type Aes128Ctr = ctr::Ctr64BE<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Clear-key CDM: raw AES-128 keys, no license exchange.
///
/// Thread-safe for parallel `decrypt` calls; the store is only mutated
/// through `&mut self` between frames.
#[derive(Clone, Debug, Default)]
pub struct ClearKeyCdm {
    keys: KeyStore,
}

impl ClearKeyCdm {
    pub fn new(keys: KeyStore) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyStore {
        &mut self.keys
    }
}

impl Cdm for ClearKeyCdm {
    fn decrypt(
        &self,
        mode: CipherMode,
        pattern: EncryptionPattern,
        block_offset: u32,
        key_id: &[u8],
        iv: &[u8; 16],
        ciphertext: &[u8],
        plaintext: &mut [u8],
    ) -> Result<(), CdmError> {
        if plaintext.len() != ciphertext.len() {
            return Err(CdmError::Other(format!(
                "plaintext length {} does not match ciphertext length {}",
                plaintext.len(),
                ciphertext.len()
            )));
        }
        if block_offset as usize >= AES_BLOCK_SIZE {
            return Err(CdmError::Other(format!(
                "block offset {block_offset} out of range"
            )));
        }
        let key = self.keys.get(key_id).ok_or(CdmError::KeyNotFound)?;

        // Decrypt in place over a copy of the input; skip stripes and
        // unaligned CBC tails are already clear and stay as copied.
        plaintext.copy_from_slice(ciphertext);

        match mode {
            CipherMode::AesCtr => decrypt_ctr(key, iv, pattern, block_offset, plaintext)?,
            CipherMode::AesCbc => {
                if block_offset != 0 {
                    // CBC has no partial-block carryover.
                    return Err(CdmError::Other(
                        "block offset is not meaningful in CBC mode".into(),
                    ));
                }
                decrypt_cbc(key, iv, pattern, plaintext);
            }
        }

        trace!(len = ciphertext.len(), ?mode, block_offset, "region decrypted");
        Ok(())
    }
}

/// AES-128-CTR over `data`, starting `block_offset` bytes into the first
/// counter block so a region straddling a subsample boundary decrypts with
/// the same counter value on both sides.
fn decrypt_ctr(
    key: &[u8; 16],
    iv: &[u8; 16],
    pattern: EncryptionPattern,
    block_offset: u32,
    data: &mut [u8],
) -> Result<(), CdmError> {
    let mut cipher = Aes128Ctr::new(key.into(), iv.into());
    cipher
        .try_seek(u64::from(block_offset))
        .map_err(|err| CdmError::Other(format!("keystream seek failed: {err}")))?;

    if pattern.is_unpatterned() {
        cipher.apply_keystream(data);
        return Ok(());
    }

    // The keystream advances only across encrypted blocks; skip stripes
    // pass through. A trailing partial block inside a crypt stripe is
    // still decrypted.
    let crypt_len = pattern.crypt_byte_block as usize * AES_BLOCK_SIZE;
    let skip_len = pattern.skip_byte_block as usize * AES_BLOCK_SIZE;
    let mut pos = 0;
    while pos < data.len() {
        let stripe_end = data.len().min(pos + crypt_len);
        cipher.apply_keystream(&mut data[pos..stripe_end]);
        pos = stripe_end + skip_len;
    }
    Ok(())
}

/// AES-128-CBC over the whole-block prefix of `data`.
///
/// A zero pattern decrypts every block (an unaligned tail stays clear).
/// With a pattern, only crypt-stripe blocks pass through the cipher, so
/// chaining carries across skipped blocks as `cbcs` requires.
fn decrypt_cbc(key: &[u8; 16], iv: &[u8; 16], pattern: EncryptionPattern, data: &mut [u8]) {
    let mut cipher = Aes128CbcDec::new(key.into(), iv.into());

    let (crypt, skip) = if pattern.is_unpatterned() {
        (1, 0)
    } else {
        (
            pattern.crypt_byte_block as usize,
            pattern.skip_byte_block as usize,
        )
    };

    let mut blocks = data.chunks_exact_mut(AES_BLOCK_SIZE);
    while blocks.len() > 0 {
        for block in blocks.by_ref().take(crypt) {
            cipher.decrypt_block_mut(block.into());
        }
        blocks.by_ref().take(skip).for_each(drop);
    }
}
