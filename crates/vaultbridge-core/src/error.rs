//! Service error taxonomy.
//!
//! Every failure the service reports pairs an [`ErrorKind`] with an
//! [`ErrorOrigin`]. The kind is the status code the caller acts on; the
//! origin preserves whether the command was rejected by this service or by
//! a call this service made downstream (protected store, storage device).
//! Store and device failures with a direct taxonomy mapping (not-found,
//! short-buffer) are mapped but keep their downstream origin.

use std::fmt;

use thiserror::Error;
use vaultbridge_crypto::EngineError;

use crate::{device::DeviceError, store::StoreError};

/// Status code of a failed command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range parameters, or an unusable session handle.
    #[error("bad parameters: {0}")]
    BadParameters(String),

    /// Command issued before its prerequisite state was reached.
    #[error("bad state: {0}")]
    BadState(String),

    /// Allocation failed (session slots, engine resources).
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// A destination buffer is smaller than the data it must receive.
    /// The output is never truncated; the call fails instead.
    #[error("short buffer: {required} bytes required")]
    ShortBuffer {
        /// Size the destination would need.
        required: usize,
    },

    /// The sealed key record does not exist.
    #[error("item not found")]
    ItemNotFound,

    /// Unknown opcode, or a declared command this service refuses.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Protected-store failure without a direct taxonomy mapping.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Storage-device failure, surfaced verbatim.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Which layer rejected the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// Rejected by this service's own validation or state machine.
    Service,
    /// Rejected by the protected object store.
    Store,
    /// Rejected by the storage-device service.
    Device,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service => write!(f, "service"),
            Self::Store => write!(f, "store"),
            Self::Device => write!(f, "device"),
        }
    }
}

/// A failed command: status code plus rejection origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (rejected by {origin})")]
pub struct ServiceError {
    /// Status code.
    pub kind: ErrorKind,
    /// Layer that rejected the command.
    pub origin: ErrorOrigin,
}

impl ServiceError {
    /// A `BadParameters` rejection by this service.
    pub fn bad_parameters(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::BadParameters(msg.into()), origin: ErrorOrigin::Service }
    }

    /// A `BadState` rejection by this service.
    pub fn bad_state(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::BadState(msg.into()), origin: ErrorOrigin::Service }
    }

    /// An `OutOfMemory` rejection by this service.
    pub fn out_of_memory(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::OutOfMemory(msg.into()), origin: ErrorOrigin::Service }
    }

    /// A `NotSupported` rejection by this service.
    pub fn not_supported(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::NotSupported(msg.into()), origin: ErrorOrigin::Service }
    }

    /// Surface a protected-store failure.
    ///
    /// `NotFound` and `ShortBuffer` map onto the service taxonomy; anything
    /// else stays wrapped. The origin is `Store` either way.
    pub fn from_store(err: StoreError) -> Self {
        let kind = match err {
            StoreError::NotFound => ErrorKind::ItemNotFound,
            StoreError::ShortBuffer { required } => ErrorKind::ShortBuffer { required },
            other => ErrorKind::Store(other),
        };
        Self { kind, origin: ErrorOrigin::Store }
    }

    /// Surface a storage-device failure verbatim.
    pub fn from_device(err: DeviceError) -> Self {
        Self { kind: ErrorKind::Device(err), origin: ErrorOrigin::Device }
    }
}

/// Engine failures are service-side: they are state or parameter errors
/// detected before or during the transform, never downstream failures.
impl From<EngineError> for ServiceError {
    fn from(err: EngineError) -> Self {
        let kind = match err {
            EngineError::NoKeyBound | EngineError::StreamNotInitialized => {
                ErrorKind::BadState(err.to_string())
            },
            EngineError::KeyLengthMismatch { .. }
            | EngineError::IvLengthMismatch { .. }
            | EngineError::NotBlockAligned { .. }
            | EngineError::ShortOutput { .. } => ErrorKind::BadParameters(err.to_string()),
        };
        Self { kind, origin: ErrorOrigin::Service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_item_not_found() {
        let err = ServiceError::from_store(StoreError::NotFound);
        assert_eq!(err.kind, ErrorKind::ItemNotFound);
        assert_eq!(err.origin, ErrorOrigin::Store);
    }

    #[test]
    fn store_short_buffer_keeps_required_size() {
        let err = ServiceError::from_store(StoreError::ShortBuffer { required: 32 });
        assert_eq!(err.kind, ErrorKind::ShortBuffer { required: 32 });
        assert_eq!(err.origin, ErrorOrigin::Store);
    }

    #[test]
    fn device_errors_keep_device_origin() {
        let err = ServiceError::from_device(DeviceError::Bus("nack".to_string()));
        assert_eq!(err.origin, ErrorOrigin::Device);
        assert!(matches!(err.kind, ErrorKind::Device(_)));
    }

    #[test]
    fn engine_state_errors_become_bad_state() {
        let err = ServiceError::from(EngineError::StreamNotInitialized);
        assert!(matches!(err.kind, ErrorKind::BadState(_)));
        assert_eq!(err.origin, ErrorOrigin::Service);
    }

    #[test]
    fn display_names_the_origin() {
        let err = ServiceError::bad_state("no cipher engine allocated");
        assert_eq!(
            err.to_string(),
            "bad state: no cipher engine allocated (rejected by service)"
        );
    }
}
