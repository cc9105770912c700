//! Session arena with generation-checked handles.
//!
//! Callers never hold references into service state. A session is addressed
//! by a [`SessionHandle`], an index plus a generation counter. Closing a
//! session bumps the slot's generation, so a handle kept past close misses
//! the generation check and is rejected instead of aliasing whatever session
//! reuses the slot.

use vaultbridge_crypto::CipherEngine;

/// Opaque session handle: slot index plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle {
    index: u32,
    generation: u32,
}

/// Per-session state: the cipher engine, once PREPARE has run.
///
/// A freshly opened session has no engine. PREPARE installs one (replacing
/// any previous engine, which releases its stream and zeroizes its key on
/// drop).
#[derive(Default)]
pub struct CipherSession {
    engine: Option<CipherEngine>,
}

impl CipherSession {
    /// A session with no engine allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether PREPARE has installed a cipher engine.
    pub fn is_prepared(&self) -> bool {
        self.engine.is_some()
    }

    /// The session's engine, if one is installed.
    pub fn engine_mut(&mut self) -> Option<&mut CipherEngine> {
        self.engine.as_mut()
    }

    /// Install an engine, dropping any previous one.
    pub fn install(&mut self, engine: CipherEngine) {
        self.engine = Some(engine);
    }

    /// Drop the engine, returning the session to its unprepared state.
    pub fn release(&mut self) {
        self.engine = None;
    }
}

struct Slot {
    generation: u32,
    session: Option<CipherSession>,
}

/// Fixed-capacity arena of cipher sessions.
///
/// Slots are recycled through a free list; each reuse increments the slot's
/// generation so stale handles never resolve.
pub struct SessionArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    capacity: usize,
}

/// Default session capacity when none is configured.
pub(crate) const DEFAULT_SESSIONS: usize = 64;

impl SessionArena {
    /// An arena that can hold up to `capacity` concurrent sessions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::new(), free: Vec::new(), capacity }
    }

    /// Number of currently open sessions.
    pub fn open_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Open a session. Returns `None` when the arena is full.
    pub fn open(&mut self) -> Option<SessionHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.session = Some(CipherSession::new());
            return Some(SessionHandle { index, generation: slot.generation });
        }

        if self.slots.len() >= self.capacity {
            return None;
        }

        let index = u32::try_from(self.slots.len()).ok()?;
        self.slots.push(Slot { generation: 0, session: Some(CipherSession::new()) });
        Some(SessionHandle { index, generation: 0 })
    }

    /// Close the session behind `handle`.
    ///
    /// Dropping the session zeroizes its key via the engine's drop path.
    /// A stale or already-closed handle is a no-op.
    pub fn close(&mut self, handle: SessionHandle) {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return;
        };
        if slot.generation != handle.generation || slot.session.is_none() {
            return;
        }
        slot.session = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
    }

    /// Resolve `handle` to its session, or `None` if the handle is stale.
    pub fn get_mut(&mut self, handle: SessionHandle) -> Option<&mut CipherSession> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.session.as_mut()
    }
}
