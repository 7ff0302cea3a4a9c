#![forbid(unsafe_code)]

//! IV arithmetic over 16-byte initialization vectors.
//!
//! A CTR IV is a big-endian 128-bit value whose low 64 bits act as the
//! block counter; the high 64 bits are the nonce and never change within a
//! frame.

use crate::AES_BLOCK_SIZE;

/// Add `count` to the big-endian counter occupying `iv[8..16]`.
///
/// The addition wraps at bit 64; the nonce half is never modified.
pub fn increment_ctr(count: u32, iv: &mut [u8; 16]) {
    let mut counter = [0u8; 8];
    counter.copy_from_slice(&iv[8..]);
    let next = u64::from_be_bytes(counter).wrapping_add(u64::from(count));
    iv[8..].copy_from_slice(&next.to_be_bytes());
}

/// Replace `iv` with the final AES block of `ciphertext`.
///
/// Used for `cbc1` chaining, where the IV for a subsample is the previous
/// subsample's last ciphertext block (taken from the input, before
/// decryption).
///
/// # Panics
/// Panics if `ciphertext` is shorter than one AES block; the walker only
/// calls this after validating block alignment.
pub fn set_from_last_block(ciphertext: &[u8], iv: &mut [u8; 16]) {
    assert!(
        ciphertext.len() >= AES_BLOCK_SIZE,
        "ciphertext shorter than one AES block"
    );
    iv.copy_from_slice(&ciphertext[ciphertext.len() - AES_BLOCK_SIZE..]);
}
