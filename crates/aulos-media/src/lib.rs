#![forbid(unsafe_code)]

//! Packet and frame layer over the CENC decryption core.
//!
//! [`Packet`] models a demuxed elementary-stream packet with typed
//! side-data blobs. [`EncodedFrame`] is the caller-facing gateway: it
//! decodes a packet's encryption metadata, classifies the protection
//! scheme, and drives the subsample walker in `aulos-cenc` against a
//! caller-supplied CDM.

mod frame;
mod packet;
mod side_data;

pub use frame::{EncodedFrame, TimeBase};
pub use packet::{Packet, SideData, SideDataKind};
pub use side_data::{SideDataError, decode_encryption_info, encode_encryption_info};
