//! CIPHER: transform a buffer and relay it through the storage device.
//!
//! Encrypting, the caller's plaintext is transformed and the ciphertext is
//! written to the EEPROM at the given offset. Decrypting, a full transfer
//! unit is read from the EEPROM, transformed, and returned to the caller.
//! Each command opens a fresh device connection and drops it before
//! returning.

use tracing::{debug, warn};
use vaultbridge_crypto::{CipherMode, KeyState, MAX_TRANSFER};
use vaultbridge_proto::OutBuf;

use crate::{
    device::{DeviceConnection, EEPROM_SELECT, StorageDevice},
    error::ServiceError,
    service::{CipherService, stale_handle},
    session::SessionHandle,
    store::SecureStore,
};

impl<S: SecureStore, D: StorageDevice> CipherService<S, D> {
    /// Run one cipher-and-relay command.
    ///
    /// The output buffer must hold a full transfer unit in both directions,
    /// matching the deployed callers. Device failures surface with a device
    /// origin and leave the session usable for a retry.
    ///
    /// # Errors
    ///
    /// - `BadParameters`: output capacity below [`MAX_TRANSFER`], offset
    ///   outside the device's 16-bit address space, or (encrypting) input
    ///   longer than one transfer unit.
    /// - `BadState`: PREPARE has not run, or no IV has been set since the
    ///   engine was (re)keyed.
    /// - `Device` (origin device): connection or transfer failure.
    pub(crate) fn cipher(
        &mut self,
        handle: SessionHandle,
        input: &[u8],
        output: &mut OutBuf<'_>,
        offset_raw: u32,
    ) -> Result<(), ServiceError> {
        if output.capacity() < MAX_TRANSFER {
            return Err(ServiceError::bad_parameters(format!(
                "output buffer must hold {MAX_TRANSFER} bytes, got {}",
                output.capacity()
            )));
        }
        let offset = u16::try_from(offset_raw).map_err(|_| {
            ServiceError::bad_parameters(format!(
                "device offset {offset_raw} exceeds the 16-bit address space"
            ))
        })?;

        let session = self.sessions.get_mut(handle).ok_or_else(stale_handle)?;
        let engine = session
            .engine_mut()
            .ok_or_else(|| ServiceError::bad_state("PREPARE has not run on this session"))?;

        if engine.key_state() == KeyState::Bootstrap {
            warn!(?handle, "transforming with the bootstrap key; no sealed key was loaded");
        }

        match engine.mode() {
            CipherMode::Encrypt => {
                if input.len() > MAX_TRANSFER {
                    return Err(ServiceError::bad_parameters(format!(
                        "input length {} exceeds the {MAX_TRANSFER}-byte transfer unit",
                        input.len()
                    )));
                }

                let mut ciphertext = vec![0u8; input.len()];
                engine.update(input, &mut ciphertext)?;

                let mut conn = self.device.open().map_err(ServiceError::from_device)?;
                conn.write(EEPROM_SELECT, offset, &ciphertext)
                    .map_err(ServiceError::from_device)?;
                debug!(?handle, offset, len = ciphertext.len(), "ciphertext relayed to device");
            },
            CipherMode::Decrypt => {
                let mut ciphertext = vec![0u8; MAX_TRANSFER];
                {
                    let mut conn = self.device.open().map_err(ServiceError::from_device)?;
                    conn.read(EEPROM_SELECT, offset, &mut ciphertext)
                        .map_err(ServiceError::from_device)?;
                }

                let produced = engine.update(&ciphertext, output.buf_mut())?;
                output.commit(produced);
                debug!(?handle, offset, len = produced, "plaintext relayed from device");
            },
        }

        Ok(())
    }
}
