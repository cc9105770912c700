//! Storage-device error types.

use thiserror::Error;

/// Errors reported by the storage-device service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Transfer would run past the end of the device's address space.
    #[error("transfer out of range: offset {offset} + {len} bytes exceeds device size {size}")]
    OutOfRange {
        /// Start offset of the transfer.
        offset: u16,
        /// Length of the transfer in bytes.
        len: usize,
        /// Device capacity in bytes.
        size: usize,
    },

    /// No device answered at the given select address.
    #[error("no device at select address {select}")]
    NoDevice {
        /// Select address that went unanswered.
        select: u8,
    },

    /// Bus-level transfer failure.
    #[error("bus error: {0}")]
    Bus(String),

    /// The device service itself could not be reached.
    #[error("device service unavailable: {0}")]
    Unavailable(String),
}
