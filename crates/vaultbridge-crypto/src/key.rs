//! Key material container.

use std::fmt;

use zeroize::Zeroize;

/// Owned raw key bytes, zeroized on drop.
///
/// The container deliberately implements neither `Clone` nor `Copy`; key
/// material moves into the engine exactly once per (re)bind. `Debug` prints
/// the length only.
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Wrap key bytes. Takes ownership so no second copy lingers.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// All-zero key of the given length (the bootstrap placeholder).
    pub fn zeroed(len: usize) -> Self {
        Self { bytes: vec![0u8; len] }
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({} bytes)", self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_key_has_requested_length() {
        let key = KeyMaterial::zeroed(16);
        assert_eq!(key.len(), 16);
        assert!(key.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn debug_does_not_print_bytes() {
        let key = KeyMaterial::new([0x42u8; 16].to_vec());
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "KeyMaterial(16 bytes)");
    }
}
