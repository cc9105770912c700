//! SET_IV: restart the session's cipher stream.

use tracing::debug;

use crate::{
    device::StorageDevice,
    error::ServiceError,
    service::{CipherService, stale_handle},
    session::SessionHandle,
    store::SecureStore,
};

impl<S: SecureStore, D: StorageDevice> CipherService<S, D> {
    /// Start (or restart) the cipher stream at `iv`.
    ///
    /// Restarting rewinds chaining and counter state, so the same IV
    /// reproduces the same keystream. ECB ignores the IV content but the
    /// block-size length requirement is enforced uniformly.
    ///
    /// # Errors
    ///
    /// - `BadState`: PREPARE has not run on this session.
    /// - `BadParameters`: IV length is not the cipher block size.
    pub(crate) fn set_iv(&mut self, handle: SessionHandle, iv: &[u8]) -> Result<(), ServiceError> {
        let session = self.sessions.get_mut(handle).ok_or_else(stale_handle)?;
        let engine = session
            .engine_mut()
            .ok_or_else(|| ServiceError::bad_state("PREPARE has not run on this session"))?;

        engine.init(iv)?;
        debug!(?handle, "cipher stream initialized");
        Ok(())
    }
}
