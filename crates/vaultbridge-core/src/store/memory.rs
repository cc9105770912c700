//! In-memory protected store for testing and simulation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{SecureStore, StoreError};

/// In-memory [`SecureStore`] implementation.
///
/// Records live in a `HashMap` behind `Arc<Mutex<_>>` so clones share the
/// same underlying store (two service instances can contend on the same
/// sealed record, as they would on a real protected store). Writes are
/// atomic, which trivially satisfies the no-partial-record invariant.
/// Uses `lock().expect()` which will panic if the mutex is poisoned -
/// acceptable for test code.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    pub fn record_count(&self) -> usize {
        self.records.lock().expect("Mutex poisoned").len()
    }
}

impl SecureStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn write(&self, id: &str, bytes: &[u8], overwrite: bool) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("Mutex poisoned");

        if !overwrite && records.contains_key(id) {
            return Err(StoreError::AlreadyExists);
        }

        records.insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn read(&self, id: &str, dest: &mut [u8]) -> Result<usize, StoreError> {
        let records = self.records.lock().expect("Mutex poisoned");

        let data = records.get(id).ok_or(StoreError::NotFound)?;
        if data.len() > dest.len() {
            // Destination untouched; the caller learns the required size.
            return Err(StoreError::ShortBuffer { required: data.len() });
        }

        dest[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("Mutex poisoned");
        records.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
