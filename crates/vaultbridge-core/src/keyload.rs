//! Sealed-key loading and store administration.
//!
//! The cipher key never crosses the untrusted boundary on the cipher path.
//! It is sealed into the protected store under a fixed identifier
//! (`WRITE_RAW`), loaded into the engine internally after PREPARE, and can
//! be read back for provisioning checks (`READ_RAW`).

use tracing::debug;
use vaultbridge_crypto::{KeyClass, KeyMaterial};
use vaultbridge_proto::OutBuf;

use crate::{
    device::StorageDevice,
    error::ServiceError,
    service::{CipherService, stale_handle},
    session::SessionHandle,
    store::SecureStore,
};

/// Identifier of the sealed AES key record in the protected store.
pub const SEALED_KEY_ID: &str = "aes-storage-key";

impl<S: SecureStore, D: StorageDevice> CipherService<S, D> {
    /// Load the sealed key into the session's engine, promoting it from the
    /// bootstrap key to the real one.
    ///
    /// # Errors
    ///
    /// - `BadState`: PREPARE has not allocated an engine.
    /// - `ItemNotFound` (origin store): no key has been sealed yet. The
    ///   engine keeps the bootstrap key; the session stays usable.
    /// - `BadParameters`: the sealed record's length does not match the
    ///   engine's configured key size.
    pub(crate) fn load_sealed_key(&mut self, handle: SessionHandle) -> Result<(), ServiceError> {
        let session = self.sessions.get_mut(handle).ok_or_else(stale_handle)?;
        let engine = session
            .engine_mut()
            .ok_or_else(|| ServiceError::bad_state("no cipher engine allocated"))?;
        let expected = engine.key_size().bytes();

        let mut buf = vec![0u8; expected];
        let read =
            self.store.read(SEALED_KEY_ID, &mut buf).map_err(ServiceError::from_store)?;
        if read != expected {
            return Err(ServiceError::bad_parameters(format!(
                "sealed key record is {read} bytes, engine expects {expected}"
            )));
        }

        engine.set_key(KeyMaterial::new(buf), KeyClass::Real)?;
        debug!(?handle, bytes = expected, "sealed key loaded");
        Ok(())
    }

    /// Seal raw key bytes into the protected store (`WRITE_RAW`).
    ///
    /// Overwrites any previously sealed record. Sessions prepared before
    /// this call keep the key they already loaded.
    pub(crate) fn seal_key(&mut self, bytes: &[u8]) -> Result<(), ServiceError> {
        self.store.write(SEALED_KEY_ID, bytes, true).map_err(ServiceError::from_store)?;
        debug!(bytes = bytes.len(), "key material sealed");
        Ok(())
    }

    /// Read the sealed record back out of the store (`READ_RAW`).
    ///
    /// On a short destination the store leaves it untouched and the error
    /// carries the required size.
    pub(crate) fn read_sealed_key(&mut self, out: &mut OutBuf<'_>) -> Result<(), ServiceError> {
        let read =
            self.store.read(SEALED_KEY_ID, out.buf_mut()).map_err(ServiceError::from_store)?;
        out.commit(read);
        Ok(())
    }
}
