//! PREPARE: configure a session and allocate its cipher engine.

use tracing::debug;
use vaultbridge_crypto::{Algorithm, CipherEngine, CipherMode, KeyClass, KeyMaterial, KeySize};

use crate::{
    device::StorageDevice,
    error::ServiceError,
    service::{CipherService, stale_handle},
    session::SessionHandle,
    store::SecureStore,
};

impl<S: SecureStore, D: StorageDevice> CipherService<S, D> {
    /// Allocate (or reallocate) the session's cipher engine and eagerly load
    /// the sealed key.
    ///
    /// Any previous engine is released first, so PREPARE on an already
    /// prepared session reconfigures it from scratch. The sealed-key load
    /// runs as part of this command and its status is the command's status;
    /// on `ItemNotFound` the engine stays on the bootstrap key and the
    /// session remains usable.
    ///
    /// # Errors
    ///
    /// - `BadParameters`: unknown algorithm, key size, or mode selector.
    /// - Everything [`load_sealed_key`](Self::load_sealed_key) can return.
    pub(crate) fn prepare(
        &mut self,
        handle: SessionHandle,
        algorithm_raw: u32,
        key_size_raw: u32,
        mode_raw: u32,
    ) -> Result<(), ServiceError> {
        let algorithm = Algorithm::from_raw(algorithm_raw).ok_or_else(|| {
            ServiceError::bad_parameters(format!("unknown algorithm selector {algorithm_raw}"))
        })?;
        let key_size = KeySize::from_raw(key_size_raw).ok_or_else(|| {
            ServiceError::bad_parameters(format!("unsupported key size {key_size_raw}"))
        })?;
        let mode = CipherMode::from_raw(mode_raw).ok_or_else(|| {
            ServiceError::bad_parameters(format!("unknown mode selector {mode_raw}"))
        })?;

        let mut engine = CipherEngine::allocate(algorithm, mode, key_size);
        // A fresh engine refuses reset while unkeyed, so bind the all-zero
        // bootstrap key before anything else touches it.
        engine.set_key(KeyMaterial::zeroed(key_size.bytes()), KeyClass::Bootstrap)?;

        let session = self.sessions.get_mut(handle).ok_or_else(stale_handle)?;
        session.release();
        session.install(engine);
        debug!(
            ?handle,
            ?algorithm,
            ?mode,
            key_bits = key_size.bits(),
            "cipher engine allocated"
        );

        self.load_sealed_key(handle)
    }
}
