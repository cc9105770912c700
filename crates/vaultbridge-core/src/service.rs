//! The cipher service and its command dispatcher.

use tracing::debug;
use vaultbridge_proto::{Opcode, Param, Params};

use crate::{
    device::StorageDevice,
    error::ServiceError,
    session::{DEFAULT_SESSIONS, SessionArena, SessionHandle},
    store::SecureStore,
};

/// The trusted cipher-and-storage service.
///
/// Generic over its two collaborators so production backends and in-memory
/// fakes run the same code. All state is owned by the service; callers
/// interact only through handles and tagged parameter slots.
pub struct CipherService<S: SecureStore, D: StorageDevice> {
    pub(crate) store: S,
    pub(crate) device: D,
    pub(crate) sessions: SessionArena,
}

impl<S: SecureStore, D: StorageDevice> CipherService<S, D> {
    /// A service with the default session capacity.
    pub fn new(store: S, device: D) -> Self {
        Self::with_max_sessions(store, device, DEFAULT_SESSIONS)
    }

    /// A service that admits at most `max_sessions` concurrent sessions.
    pub fn with_max_sessions(store: S, device: D, max_sessions: usize) -> Self {
        Self { store, device, sessions: SessionArena::with_capacity(max_sessions) }
    }

    /// Open a session.
    ///
    /// # Errors
    ///
    /// - `OutOfMemory`: the session arena is full.
    pub fn open_session(&mut self) -> Result<SessionHandle, ServiceError> {
        let handle = self
            .sessions
            .open()
            .ok_or_else(|| ServiceError::out_of_memory("session arena is full"))?;
        debug!(?handle, "session opened");
        Ok(handle)
    }

    /// Close a session, releasing its engine and zeroizing its key.
    ///
    /// Stale handles are ignored; close is idempotent.
    pub fn close_session(&mut self, handle: SessionHandle) {
        self.sessions.close(handle);
        debug!(?handle, "session closed");
    }

    /// Dispatch one command against a session.
    ///
    /// Validates the handle, the opcode, and the parameter-slot shape before
    /// routing to a handler. A failed command never leaves the session in a
    /// partially updated state; the caller may retry or continue.
    ///
    /// # Errors
    ///
    /// - `BadParameters`: stale handle, or slot tags that do not match the
    ///   opcode's declared signature.
    /// - `NotSupported`: unknown opcode, or `SET_KEY`.
    /// - Everything the routed handler can return.
    pub fn invoke(
        &mut self,
        handle: SessionHandle,
        raw_opcode: u32,
        params: &mut Params<'_>,
    ) -> Result<(), ServiceError> {
        if self.sessions.get_mut(handle).is_none() {
            return Err(stale_handle());
        }

        let opcode = Opcode::from_raw(raw_opcode)
            .ok_or_else(|| ServiceError::not_supported(format!("unknown opcode {raw_opcode}")))?;
        opcode
            .check(params.kinds())
            .map_err(|err| ServiceError::bad_parameters(err.to_string()))?;

        debug!(?handle, ?opcode, params = ?params, "dispatching command");

        match (opcode, &mut params.slots) {
            (
                Opcode::Prepare,
                [Param::Value(algorithm), Param::Value(key_size), Param::Value(mode), Param::None],
            ) => self.prepare(handle, *algorithm, *key_size, *mode),
            (Opcode::SetKey, _) => Err(ServiceError::not_supported(
                "key material is loaded from the sealed store, not accepted from callers",
            )),
            (Opcode::SetIv, [Param::In(iv), ..]) => self.set_iv(handle, iv),
            (
                Opcode::Cipher,
                [Param::In(input), Param::Out(output), Param::Value(offset), Param::None],
            ) => self.cipher(handle, input, output, *offset),
            (Opcode::WriteRaw, [Param::In(bytes), ..]) => self.seal_key(bytes),
            (Opcode::ReadRaw, [Param::Out(output), ..]) => self.read_sealed_key(output),
            // Unreachable after the signature check, but the dispatcher
            // stays total without panicking.
            _ => Err(ServiceError::bad_parameters("parameter slots do not match opcode")),
        }
    }
}

/// The rejection for a handle whose slot was closed or recycled.
pub(crate) fn stale_handle() -> ServiceError {
    ServiceError::bad_parameters("stale or closed session handle")
}
