use std::convert::TryInto;

use super::consts::MASK_KEY_LENGTH;
use crate::error::{PayloadError, Result};

pub type MaskKey = [u8; MASK_KEY_LENGTH];

pub fn mask_key_from_slice(key: &[u8]) -> Result<MaskKey> {
    key.try_into().map_err(|_| {
        PayloadError::invalid(format!(
            "mask key must be {} bytes, got {}",
            MASK_KEY_LENGTH,
            key.len()
        ))
    })
}

/// XORs `buf` in place with `key` repeated every 4 bytes.
///
/// Applying the same key twice gives back the original bytes, so this both
/// masks and unmasks.
pub fn apply_mask(buf: &mut [u8], key: MaskKey) {
    let mut chunks = buf.chunks_exact_mut(MASK_KEY_LENGTH);
    for chunk in &mut chunks {
        chunk[0] ^= key[0];
        chunk[1] ^= key[1];
        chunk[2] ^= key[2];
        chunk[3] ^= key[3];
    }
    // tail is shorter than the key, it always starts at key[0]
    for (i, byte) in chunks.into_remainder().iter_mut().enumerate() {
        *byte ^= key[i];
    }
}
