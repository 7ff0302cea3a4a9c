#![forbid(unsafe_code)]

//! Wire codec for the encryption-info side-data blob.
//!
//! Layout: six big-endian `u32` header fields (scheme tag,
//! `crypt_byte_block`, `skip_byte_block`, key-id size, IV size, subsample
//! count) followed by the key id, the IV, and one `(clear, protected)`
//! big-endian pair per subsample.

use aulos_cenc::{DecryptError, EncryptionInfo, SubsampleEntry};
use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

const HEADER_LEN: usize = 24;
const SUBSAMPLE_LEN: usize = 8;

/// Side-data decode failures.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SideDataError {
    #[error("encryption info blob truncated: need {need} bytes, have {have}")]
    Truncated { need: u64, have: u64 },

    #[error("unsupported IV size: {0}")]
    BadIvSize(usize),

    #[error("{0} trailing bytes after encryption info")]
    TrailingBytes(usize),

    #[error("subsample table allocation failed")]
    OutOfMemory,
}

impl From<SideDataError> for DecryptError {
    fn from(err: SideDataError) -> Self {
        match err {
            SideDataError::OutOfMemory => Self::OutOfMemory,
            _ => Self::Unknown,
        }
    }
}

fn be_u32(blob: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([blob[at], blob[at + 1], blob[at + 2], blob[at + 3]])
}

/// Decode an encryption-info blob.
///
/// The scheme tag is carried through raw; classifying it is the frame
/// gateway's job. IVs must be 8 or 16 bytes. The subsample table is
/// allocated fallibly so an absurd count from a corrupt container surfaces
/// as [`SideDataError::OutOfMemory`] instead of aborting.
pub fn decode_encryption_info(blob: &[u8]) -> Result<EncryptionInfo, SideDataError> {
    if blob.len() < HEADER_LEN {
        return Err(SideDataError::Truncated {
            need: HEADER_LEN as u64,
            have: blob.len() as u64,
        });
    }

    let scheme_tag = be_u32(blob, 0);
    let crypt_byte_block = be_u32(blob, 4);
    let skip_byte_block = be_u32(blob, 8);
    let key_id_len = be_u32(blob, 12) as usize;
    let iv_len = be_u32(blob, 16) as usize;
    let subsample_count = be_u32(blob, 20) as usize;

    if iv_len != 8 && iv_len != 16 {
        return Err(SideDataError::BadIvSize(iv_len));
    }

    let need = HEADER_LEN as u64
        + key_id_len as u64
        + iv_len as u64
        + subsample_count as u64 * SUBSAMPLE_LEN as u64;
    if (blob.len() as u64) < need {
        return Err(SideDataError::Truncated {
            need,
            have: blob.len() as u64,
        });
    }

    let mut at = HEADER_LEN;
    let key_id = Bytes::copy_from_slice(&blob[at..at + key_id_len]);
    at += key_id_len;
    let iv = Bytes::copy_from_slice(&blob[at..at + iv_len]);
    at += iv_len;

    let mut subsamples = Vec::new();
    subsamples
        .try_reserve_exact(subsample_count)
        .map_err(|_| SideDataError::OutOfMemory)?;
    for _ in 0..subsample_count {
        subsamples.push(SubsampleEntry::new(be_u32(blob, at), be_u32(blob, at + 4)));
        at += SUBSAMPLE_LEN;
    }

    if at != blob.len() {
        return Err(SideDataError::TrailingBytes(blob.len() - at));
    }

    Ok(EncryptionInfo {
        scheme_tag,
        crypt_byte_block,
        skip_byte_block,
        key_id,
        iv,
        subsamples,
    })
}

/// Encode encryption metadata into the side-data wire layout.
///
/// The inverse of [`decode_encryption_info`]; used by packet producers and
/// test fixtures.
pub fn encode_encryption_info(info: &EncryptionInfo) -> Bytes {
    let mut buf = BytesMut::with_capacity(
        HEADER_LEN + info.key_id.len() + info.iv.len() + info.subsamples.len() * SUBSAMPLE_LEN,
    );
    buf.put_u32(info.scheme_tag);
    buf.put_u32(info.crypt_byte_block);
    buf.put_u32(info.skip_byte_block);
    buf.put_u32(info.key_id.len() as u32);
    buf.put_u32(info.iv.len() as u32);
    buf.put_u32(info.subsamples.len() as u32);
    buf.put_slice(&info.key_id);
    buf.put_slice(&info.iv);
    for sub in &info.subsamples {
        buf.put_u32(sub.clear_bytes);
        buf.put_u32(sub.protected_bytes);
    }
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use aulos_cenc::EncryptionScheme;

    use super::*;

    fn sample_info() -> EncryptionInfo {
        EncryptionInfo::new(
            EncryptionScheme::Cens,
            Bytes::from_static(&[0xA0; 16]),
            Bytes::from_static(&[0xB0; 8]),
        )
        .with_pattern(1, 9)
        .with_subsamples(vec![
            SubsampleEntry::new(12, 500),
            SubsampleEntry::new(0, 160),
        ])
    }

    #[test]
    fn test_round_trip() {
        let info = sample_info();
        let blob = encode_encryption_info(&info);
        assert_eq!(decode_encryption_info(&blob).unwrap(), info);
    }

    #[test]
    fn test_round_trip_empty_table() {
        let info = EncryptionInfo::new(
            EncryptionScheme::Cbcs,
            Bytes::from_static(&[1; 16]),
            Bytes::from_static(&[2; 16]),
        );
        let blob = encode_encryption_info(&info);
        let decoded = decode_encryption_info(&blob).unwrap();
        assert!(decoded.subsamples.is_empty());
        assert_eq!(decoded, info);
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            decode_encryption_info(&[0u8; 10]),
            Err(SideDataError::Truncated { .. })
        ));
    }

    #[test]
    fn test_truncated_body() {
        let blob = encode_encryption_info(&sample_info());
        assert!(matches!(
            decode_encryption_info(&blob[..blob.len() - 3]),
            Err(SideDataError::Truncated { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut blob = encode_encryption_info(&sample_info()).to_vec();
        blob.push(0);
        assert_eq!(
            decode_encryption_info(&blob),
            Err(SideDataError::TrailingBytes(1))
        );
    }

    #[test]
    fn test_bad_iv_size() {
        let mut info = sample_info();
        info.iv = Bytes::from_static(&[0; 12]);
        let blob = encode_encryption_info(&info);
        assert_eq!(
            decode_encryption_info(&blob),
            Err(SideDataError::BadIvSize(12))
        );
    }

    #[test]
    fn test_errors_map_to_decrypt_taxonomy() {
        assert_eq!(
            DecryptError::from(SideDataError::OutOfMemory),
            DecryptError::OutOfMemory
        );
        assert_eq!(
            DecryptError::from(SideDataError::BadIvSize(3)),
            DecryptError::Unknown
        );
    }
}
