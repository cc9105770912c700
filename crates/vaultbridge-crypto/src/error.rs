//! Cipher engine error types.

use thiserror::Error;

/// Errors raised by [`CipherEngine`](crate::CipherEngine) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine has never had a key bound.
    ///
    /// `reset()` and `init()` require a bound key; this is the constraint
    /// that forces the allocator to install the all-zero bootstrap key
    /// immediately after allocation.
    #[error("no key bound: the engine cannot be reset or initialized before its first key")]
    NoKeyBound,

    /// Key material length does not match the configured key size.
    #[error("key length mismatch: got {got} bytes, engine expects {expected}")]
    KeyLengthMismatch {
        /// Configured key size in bytes.
        expected: usize,
        /// Length of the supplied key material.
        got: usize,
    },

    /// Initialization vector length does not equal the block size.
    #[error("iv length mismatch: got {got} bytes, block size is {expected}")]
    IvLengthMismatch {
        /// Required IV length (the block size).
        expected: usize,
        /// Length of the supplied IV.
        got: usize,
    },

    /// Input length is not a multiple of the block size (ECB/CBC only).
    #[error("input not block aligned: {len} bytes is not a multiple of {block}")]
    NotBlockAligned {
        /// Supplied input length.
        len: usize,
        /// Required alignment (the block size).
        block: usize,
    },

    /// `update` was called before `init` started a stream.
    #[error("stream not initialized: set an IV before transforming data")]
    StreamNotInitialized,

    /// Output slice cannot hold the transformed input.
    #[error("output too short: need {needed} bytes, have {have}")]
    ShortOutput {
        /// Bytes the transform would produce.
        needed: usize,
        /// Capacity of the supplied output slice.
        have: usize,
    },
}
