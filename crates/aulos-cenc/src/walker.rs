#![forbid(unsafe_code)]

//! The subsample walker: copies clear ranges through, dispatches protected
//! ranges to the CDM, and advances IV state per scheme.

use tracing::error;

use crate::{
    AES_BLOCK_SIZE, Cdm, DecryptError, DecryptResult, EncryptionInfo, EncryptionPattern,
    EncryptionScheme, iv,
};

/// Decrypt `payload` into `dest` according to `info`'s subsample table.
///
/// The walk is purely sequential: the only state is a pair of cursors, the
/// count of remaining payload bytes, the partial-block offset carried
/// across CTR subsamples, and a fresh mutable copy of the IV. Nothing here
/// suspends, retries, or performs I/O; CDM failures and malformed tables
/// are returned to the caller unchanged.
///
/// On success `dest[..payload.len()]` holds the cleartext frame. On any
/// error the destination contents are unspecified.
///
/// # Panics
/// `dest` must be at least as long as `payload`.
pub fn walk_subsamples(
    cdm: &dyn Cdm,
    scheme: EncryptionScheme,
    info: &EncryptionInfo,
    payload: &[u8],
    dest: &mut [u8],
) -> DecryptResult<()> {
    assert!(
        dest.len() >= payload.len(),
        "destination shorter than payload"
    );

    let mode = scheme.cipher_mode();
    let pattern = info.pattern();
    let mut iv = info.iv_block();

    let mut src = 0usize;
    let mut dst = 0usize;
    let mut remaining = payload.len();
    // Bytes into the current AES block already consumed by a previous
    // subsample; CTR-family only.
    let mut block_offset = 0u32;

    for sub in &info.subsamples {
        let clear = sub.clear_bytes as usize;
        let protected = sub.protected_bytes as usize;
        if remaining < clear || remaining - clear < protected {
            error!(
                clear,
                protected, remaining, "subsample exceeds remaining payload"
            );
            return Err(DecryptError::InvalidContainerData);
        }

        // Clear content passes through and never touches IV state.
        dest[dst..dst + clear].copy_from_slice(&payload[src..src + clear]);
        src += clear;
        dst += clear;
        remaining -= clear;

        if protected == 0 {
            continue;
        }

        cdm.decrypt(
            mode,
            pattern,
            block_offset,
            &info.key_id,
            &iv,
            &payload[src..src + protected],
            &mut dest[dst..dst + protected],
        )?;

        match scheme {
            EncryptionScheme::Cenc => {
                // One counter step per AES block consumed; the partial
                // block carried in from the prior subsample counts toward
                // the first step so a straddling block is counted once.
                let consumed = block_offset as usize + protected;
                iv::increment_ctr((consumed / AES_BLOCK_SIZE) as u32, &mut iv);
                block_offset = (consumed % AES_BLOCK_SIZE) as u32;
            }
            EncryptionScheme::Cens => {
                iv::increment_ctr(pattern_increment(protected, pattern, block_offset), &mut iv);
                block_offset = ((block_offset as usize + protected) % AES_BLOCK_SIZE) as u32;
            }
            EncryptionScheme::Cbc1 => {
                // The next IV is this subsample's final ciphertext block,
                // so protected regions must be whole blocks.
                if protected < AES_BLOCK_SIZE || !protected.is_multiple_of(AES_BLOCK_SIZE) {
                    error!(
                        protected,
                        "cbc1 subsample is not a whole number of AES blocks"
                    );
                    return Err(DecryptError::InvalidContainerData);
                }
                iv::set_from_last_block(&payload[src..src + protected], &mut iv);
            }
            EncryptionScheme::Cbcs => {
                // Constant IV.
            }
        }

        src += protected;
        dst += protected;
        remaining -= protected;
    }

    if remaining != 0 {
        error!(remaining, "payload bytes left over after the subsample table");
        return Err(DecryptError::InvalidContainerData);
    }

    Ok(())
}

/// Counter advance for a patterned CTR subsample.
///
/// The counter steps once per *encrypted* block, counting complete crypt
/// stripes: a trailing partial pattern cycle contributes `crypt_byte_block`
/// iff it contains a whole crypt stripe, and nothing otherwise. A zero
/// pattern degenerates to the unpatterned rule.
fn pattern_increment(protected: usize, pattern: EncryptionPattern, block_offset: u32) -> u32 {
    let crypt = pattern.crypt_byte_block as usize;
    let skip = pattern.skip_byte_block as usize;
    if crypt + skip == 0 {
        return ((block_offset as usize + protected) / AES_BLOCK_SIZE) as u32;
    }

    let num_blocks = protected / AES_BLOCK_SIZE;
    let pattern_len = crypt + skip;
    let mut increment = (num_blocks / pattern_len) * crypt;
    if num_blocks % pattern_len >= crypt {
        increment += crypt;
    }
    increment as u32
}
