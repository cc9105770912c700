//! Vaultbridge Cipher Engine
//!
//! Stateful AES transform resource for the cipher service. One engine is
//! allocated per prepared session and owns its key container; the service
//! core never sees raw AES state, only this handle.
//!
//! # Key Lifecycle
//!
//! The engine moves through an explicit three-state key machine:
//!
//! ```text
//! Unkeyed ──set_key(bootstrap)──▶ Bootstrap ──set_key(real)──▶ Real
//!                                     │                          │
//!                                     └────── set_key(real) ◀────┘
//! ```
//!
//! - `Unkeyed`: freshly allocated. The engine refuses `reset()` here, which
//!   is why the allocator binds an all-zero bootstrap key immediately.
//! - `Bootstrap`: keyed with the all-zero placeholder. Transient and
//!   untrusted for secrecy; exists only so the engine can be reset when the
//!   sealed key is loaded.
//! - `Real`: keyed with sealed key material. The only state whose output
//!   should be trusted.
//!
//! Rebinding key material always runs the reset-then-set sequence: the
//! engine only accepts a new key from its initial (stream-less) state.
//!
//! # Streaming
//!
//! `init(iv)` starts a chain; `update` transforms buffers while carrying
//! chaining/counter state across calls, so a stream may be fed in chunks.
//! ECB and CBC run without padding and require block-aligned input; CTR
//! accepts any length.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
mod error;
mod key;
mod selector;

pub use engine::{CipherEngine, KeyClass, KeyState};
pub use error::EngineError;
pub use key::KeyMaterial;
pub use selector::{Algorithm, BLOCK_SIZE, CipherMode, KeySize, MAX_TRANSFER};
