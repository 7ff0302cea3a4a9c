#![forbid(unsafe_code)]

//! Encoded-frame gateway: decoded timing, encryption classification, and
//! dispatch into the subsample walker.

use aulos_cenc::{Cdm, DecryptError, DecryptResult, walk_subsamples};
use tracing::{error, trace};

use crate::{
    packet::{Packet, SideDataKind},
    side_data::decode_encryption_info,
};

/// Rational stream time base: `num / den` seconds per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBase {
    pub num: u32,
    pub den: u32,
}

impl TimeBase {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Seconds per tick; a zero denominator yields 0.0.
    pub fn factor(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            f64::from(self.num) / f64::from(self.den)
        }
    }
}

/// An encoded, possibly encrypted frame plus its decoded timing.
///
/// Construction takes the packet by move; the frame owns the packet's
/// buffers for its lifetime and releases them on drop.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
    packet: Packet,
    stream_id: usize,
    timestamp_offset: f64,
    pts: f64,
    dts: f64,
    duration: f64,
    is_key_frame: bool,
}

impl EncodedFrame {
    pub fn from_packet(
        packet: Packet,
        time_base: TimeBase,
        stream_id: usize,
        timestamp_offset: f64,
    ) -> Self {
        let factor = time_base.factor();
        let pts = packet.pts as f64 * factor + timestamp_offset;
        let dts = packet.dts as f64 * factor + timestamp_offset;
        let duration = packet.duration as f64 * factor;
        let is_key_frame = packet.is_key_frame;
        Self {
            packet,
            stream_id,
            timestamp_offset,
            pts,
            dts,
            duration,
            is_key_frame,
        }
    }

    /// The encoded elementary-stream bytes.
    pub fn payload(&self) -> &[u8] {
        &self.packet.data
    }

    pub fn pts(&self) -> f64 {
        self.pts
    }

    pub fn dts(&self) -> f64 {
        self.dts
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn stream_id(&self) -> usize {
        self.stream_id
    }

    pub fn timestamp_offset(&self) -> f64 {
        self.timestamp_offset
    }

    pub fn is_key_frame(&self) -> bool {
        self.is_key_frame
    }

    /// True when the packet carries a non-empty encryption-info blob.
    pub fn is_encrypted(&self) -> bool {
        self.packet
            .find_side_data(SideDataKind::EncryptionInfo)
            .is_some_and(|sd| !sd.data.is_empty())
    }

    /// Payload plus side-data footprint, for memory-budget accounting.
    pub fn estimate_size(&self) -> usize {
        let side_data: usize = self.packet.side_data.iter().map(|sd| sd.data.len()).sum();
        size_of::<Self>() + self.packet.data.len() + side_data
    }

    /// Decrypt this frame's payload into `dest`.
    ///
    /// Decodes the encryption-info side data, classifies the protection
    /// scheme, and either performs a single whole-payload CDM call (empty
    /// subsample table) or walks the subsample table. On success
    /// `dest[..payload.len()]` holds the cleartext; on any error the
    /// destination contents are unspecified.
    ///
    /// # Panics
    /// `dest` must be at least as long as the payload.
    pub fn decrypt_into(&self, cdm: &dyn Cdm, dest: &mut [u8]) -> DecryptResult<()> {
        let payload = &self.packet.data;
        assert!(
            dest.len() >= payload.len(),
            "destination shorter than payload"
        );

        let Some(blob) = self.packet.find_side_data(SideDataKind::EncryptionInfo) else {
            error!("frame has no encryption info side data");
            return Err(DecryptError::Unknown);
        };
        let info = decode_encryption_info(&blob.data).map_err(|err| {
            error!(%err, "could not decode encryption info side data");
            DecryptError::from(err)
        })?;

        let Some(scheme) = info.scheme() else {
            error!(tag = info.scheme_tag, "unsupported encryption scheme");
            return Err(DecryptError::NotSupported);
        };
        if !scheme.allows_pattern() && !info.pattern().is_unpatterned() {
            error!(%scheme, "encryption pattern is not allowed with this scheme");
            return Err(DecryptError::InvalidContainerData);
        }

        if info.subsamples.is_empty() {
            // Whole-payload encryption: one CDM call, no IV bookkeeping.
            let iv = info.iv_block();
            cdm.decrypt(
                scheme.cipher_mode(),
                info.pattern(),
                0,
                &info.key_id,
                &iv,
                payload,
                &mut dest[..payload.len()],
            )?;
        } else {
            walk_subsamples(cdm, scheme, &info, payload, dest)?;
        }

        trace!(
            %scheme,
            subsamples = info.subsamples.len(),
            len = payload.len(),
            "frame decrypted"
        );
        Ok(())
    }

    /// Decrypt this frame's payload into a freshly allocated buffer.
    ///
    /// The destination is allocated fallibly; allocation failure surfaces
    /// as [`DecryptError::OutOfMemory`].
    pub fn decrypt(&self, cdm: &dyn Cdm) -> DecryptResult<Vec<u8>> {
        let len = self.packet.data.len();
        let mut dest = Vec::new();
        dest.try_reserve_exact(len)
            .map_err(|_| DecryptError::OutOfMemory)?;
        dest.resize(len, 0);
        self.decrypt_into(cdm, &mut dest)?;
        Ok(dest)
    }
}
