//! Protected-store error types.

use thiserror::Error;

/// Errors reported by a [`SecureStore`](super::SecureStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record exists under the requested identifier.
    #[error("object not found")]
    NotFound,

    /// A record already exists and overwrite was not requested.
    #[error("object already exists and overwrite was not requested")]
    AlreadyExists,

    /// The stored record is larger than the destination buffer.
    #[error("stored object is {required} bytes, larger than the destination")]
    ShortBuffer {
        /// Actual size of the stored record.
        required: usize,
    },

    /// Underlying storage failure (corruption, medium error, injected fault).
    #[error("store I/O error: {0}")]
    Io(String),
}
