//! Protected object store abstraction.
//!
//! The sealed key lives in a persistent key-value store whose contents are
//! reachable only from the trusted service. The trait is synchronous and
//! deliberately narrow (read/write/delete by identifier) so the core can be
//! tested against in-memory fakes without any trusted-execution runtime.

mod chaotic;
mod error;
mod memory;

pub use chaotic::ChaoticStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// Protected object store: persistent records keyed by string identifier.
///
/// Implementations provide their own internal mutual exclusion; the service
/// issues plain blocking calls and does not serialize contention between
/// sessions itself.
///
/// # Invariants
///
/// - A failed `write` must not leave a partial record behind: either the
///   full record is durable or no record exists (delete on partial write).
/// - `read` never truncates. If the stored record is larger than `dest`,
///   the call fails with [`StoreError::ShortBuffer`] and `dest` is left
///   untouched.
pub trait SecureStore {
    /// Create or overwrite the record under `id`.
    ///
    /// With `overwrite` false, writing over an existing record fails with
    /// [`StoreError::AlreadyExists`].
    fn write(&self, id: &str, bytes: &[u8], overwrite: bool) -> Result<(), StoreError>;

    /// Read the record under `id` into `dest`, returning the record length.
    fn read(&self, id: &str, dest: &mut [u8]) -> Result<usize, StoreError>;

    /// Delete the record under `id`.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
