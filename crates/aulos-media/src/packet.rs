#![forbid(unsafe_code)]

use bytes::Bytes;

/// Discriminates the opaque side-data blobs a packet can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideDataKind {
    /// Common-encryption metadata: scheme, key id, IV, subsample table.
    EncryptionInfo,
    /// A blob this layer does not interpret, tagged by its container type.
    Other(u32),
}

/// One typed side-data blob.
#[derive(Clone, Debug)]
pub struct SideData {
    pub kind: SideDataKind,
    pub data: Bytes,
}

impl SideData {
    pub fn new(kind: SideDataKind, data: Bytes) -> Self {
        Self { kind, data }
    }
}

/// A demuxed elementary-stream packet.
///
/// Timestamps are in stream ticks; the stream time base converts them to
/// seconds. The packet owns its buffers: moving it into a frame transfers
/// ownership, and dropping the frame releases them.
#[derive(Clone, Debug, Default)]
pub struct Packet {
    pub data: Bytes,
    pub pts: i64,
    pub dts: i64,
    pub duration: i64,
    pub is_key_frame: bool,
    pub side_data: Vec<SideData>,
}

impl Packet {
    /// The first side-data blob of the given kind, if any.
    pub fn find_side_data(&self, kind: SideDataKind) -> Option<&SideData> {
        self.side_data.iter().find(|sd| sd.kind == kind)
    }
}
