//! Decrypt a synthetic cenc-encrypted frame with the clear-key CDM.
//!
//! Run with `cargo run -p aulos-media --example decrypt_frame`.

use aes::{
    Aes128,
    cipher::{KeyIvInit, StreamCipher},
};
use aulos_cenc::{EncryptionInfo, EncryptionScheme, SubsampleEntry};
use aulos_clearkey::{ClearKeyCdm, KeyStore};
use aulos_media::{EncodedFrame, Packet, SideData, SideDataKind, TimeBase, encode_encryption_info};
use bytes::Bytes;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let key_id = b"example-key-id-0";
    let key = [0x42u8; 16];
    let iv = [0u8; 16];

    // A 48-byte "frame": a 4-byte clear header, then 44 encrypted bytes.
    let clear: Vec<u8> = (0u8..48).collect();
    let mut payload = clear.clone();
    let mut cipher = ctr::Ctr64BE::<Aes128>::new((&key).into(), (&iv).into());
    cipher.apply_keystream(&mut payload[4..]);

    let info = EncryptionInfo::new(
        EncryptionScheme::Cenc,
        Bytes::copy_from_slice(key_id),
        Bytes::copy_from_slice(&iv),
    )
    .with_subsamples(vec![SubsampleEntry::new(4, 44)]);

    let packet = Packet {
        data: Bytes::from(payload),
        pts: 3600,
        dts: 3600,
        duration: 1200,
        is_key_frame: true,
        side_data: vec![SideData::new(
            SideDataKind::EncryptionInfo,
            encode_encryption_info(&info),
        )],
    };
    let frame = EncodedFrame::from_packet(packet, TimeBase::new(1, 90_000), 0, 0.0);

    let mut keys = KeyStore::new();
    keys.insert(&key_id[..], key);
    let cdm = ClearKeyCdm::new(keys);

    let decrypted = frame.decrypt(&cdm).expect("decryption failed");
    assert_eq!(decrypted, clear);
    println!(
        "decrypted {} bytes, pts {:.3}s, duration {:.3}s",
        decrypted.len(),
        frame.pts(),
        frame.duration()
    );
}
