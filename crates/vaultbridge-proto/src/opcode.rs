//! Command opcodes and their declared parameter signatures.
//!
//! Wire values are part of the deployed protocol and must not be renumbered.

use thiserror::Error;

use crate::params::ParamKind;

/// Closed set of commands the cipher service understands.
///
/// `SetKey` is declared for protocol completeness but the service rejects it:
/// key material is loaded from the sealed store, never accepted from the
/// caller. `ReadRaw` is an administrative store read, not exercised by the
/// cipher path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Configure algorithm/key-size/mode and allocate cipher resources.
    Prepare,
    /// Load a caller-supplied key (declared, never accepted).
    SetKey,
    /// Reset the cipher stream with a fresh initialization vector.
    SetIv,
    /// Transform a buffer and relay it to/from the storage device.
    Cipher,
    /// Seal raw key bytes into the protected store.
    WriteRaw,
    /// Read the sealed key record back out of the protected store.
    ReadRaw,
}

/// Parameter-slot tags did not match the opcode's declared signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parameter signature mismatch for {opcode:?}: expected {expected:?}, got {got:?}")]
pub struct SignatureMismatch {
    /// Opcode whose signature was violated.
    pub opcode: Opcode,
    /// Slot tags the opcode declares.
    pub expected: [ParamKind; 4],
    /// Slot tags the caller supplied.
    pub got: [ParamKind; 4],
}

impl Opcode {
    /// Raw wire value of this opcode.
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Prepare => 0,
            Self::SetKey => 1,
            Self::SetIv => 2,
            Self::Cipher => 3,
            Self::WriteRaw => 4,
            Self::ReadRaw => 5,
        }
    }

    /// Parse a raw wire value. `None` for anything outside the closed set.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Prepare),
            1 => Some(Self::SetKey),
            2 => Some(Self::SetIv),
            3 => Some(Self::Cipher),
            4 => Some(Self::WriteRaw),
            5 => Some(Self::ReadRaw),
            _ => None,
        }
    }

    /// Declared slot signature for this opcode.
    ///
    /// - `Prepare`: algorithm selector, key size in bytes, mode selector
    /// - `SetKey`: key bytes (declared only; the service refuses the command)
    /// - `SetIv`: initialization vector bytes
    /// - `Cipher`: input buffer, output buffer, device offset
    /// - `WriteRaw`: raw key bytes to seal
    /// - `ReadRaw`: destination buffer for the sealed record
    pub const fn signature(self) -> [ParamKind; 4] {
        use ParamKind::{In, None, Out, Value};
        match self {
            Self::Prepare => [Value, Value, Value, None],
            Self::SetKey | Self::SetIv | Self::WriteRaw => [In, None, None, None],
            Self::Cipher => [In, Out, Value, None],
            Self::ReadRaw => [Out, None, None, None],
        }
    }

    /// Check supplied slot tags against this opcode's declared signature.
    pub fn check(self, got: [ParamKind; 4]) -> Result<(), SignatureMismatch> {
        let expected = self.signature();
        if got == expected {
            Ok(())
        } else {
            Err(SignatureMismatch { opcode: self, expected, got })
        }
    }
}
