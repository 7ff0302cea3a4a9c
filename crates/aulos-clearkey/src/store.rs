#![forbid(unsafe_code)]

//! In-memory content-key table.

use std::collections::HashMap;

/// Content keys indexed by key id.
///
/// Key ids are opaque byte strings (typically 16 bytes); keys are raw
/// AES-128 keys. Rotation is just insert/remove between frames.
#[derive(Clone, Debug, Default)]
pub struct KeyStore {
    keys: HashMap<Vec<u8>, [u8; 16]>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the key for `key_id`.
    pub fn insert(&mut self, key_id: impl Into<Vec<u8>>, key: [u8; 16]) {
        self.keys.insert(key_id.into(), key);
    }

    /// Remove the key for `key_id`, returning it if present.
    pub fn remove(&mut self, key_id: &[u8]) -> Option<[u8; 16]> {
        self.keys.remove(key_id)
    }

    pub fn get(&self, key_id: &[u8]) -> Option<&[u8; 16]> {
        self.keys.get(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
