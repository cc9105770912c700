//! Cipher configuration selectors and sizing constants.
//!
//! Raw selector values are part of the deployed command protocol and must
//! not be renumbered.

/// AES block size in bytes. Also the required IV length.
pub const BLOCK_SIZE: usize = 16;

/// Maximum bytes moved through the cipher/storage bridge in one command.
pub const MAX_TRANSFER: usize = 4096;

/// AES chaining flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Electronic codebook, no padding.
    Ecb,
    /// Cipher block chaining, no padding.
    Cbc,
    /// Counter mode.
    Ctr,
}

impl Algorithm {
    /// Parse a raw selector value. `None` on anything out of range.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Ecb),
            1 => Some(Self::Cbc),
            2 => Some(Self::Ctr),
            _ => None,
        }
    }

    /// Raw selector value.
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Ecb => 0,
            Self::Cbc => 1,
            Self::Ctr => 2,
        }
    }

    /// Whether input to `update` must be a multiple of [`BLOCK_SIZE`].
    pub const fn requires_block_alignment(self) -> bool {
        !matches!(self, Self::Ctr)
    }
}

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    /// Decrypt: fetch ciphertext from the device, transform to plaintext.
    Decrypt,
    /// Encrypt: transform plaintext, forward ciphertext to the device.
    Encrypt,
}

impl CipherMode {
    /// Parse a raw selector value. `None` on anything out of range.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Decrypt),
            1 => Some(Self::Encrypt),
            _ => None,
        }
    }

    /// Raw selector value.
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Decrypt => 0,
            Self::Encrypt => 1,
        }
    }
}

/// Supported AES key sizes. The raw selector is the size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key (16 bytes).
    Aes128,
    /// 256-bit key (32 bytes).
    Aes256,
}

impl KeySize {
    /// Parse a raw selector (key size in bytes). `None` on anything else.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            16 => Some(Self::Aes128),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }

    /// Key size in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes256 => 32,
        }
    }

    /// Key size in bits.
    pub const fn bits(self) -> usize {
        self.bytes() * 8
    }
}
