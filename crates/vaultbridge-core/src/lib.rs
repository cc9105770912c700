//! Vaultbridge service core.
//!
//! The trusted cipher-and-storage service: per-session AES state machines,
//! a sealed-key loader backed by a protected object store, and a bridge
//! that relays ciphertext to and from an external EEPROM through a
//! separate storage-device service.
//!
//! # Architecture
//!
//! The service is a server toward its untrusted caller and a client toward
//! the storage-device service. Commands arrive as an opcode plus four
//! tagged parameter slots ([`vaultbridge_proto`]); the dispatcher validates
//! the slot shape, resolves the session, and routes to a handler:
//!
//! ```text
//! caller ──invoke──▶ dispatcher ──▶ PREPARE   (allocate engine + bootstrap key,
//!                        │                     then eager sealed-key load)
//!                        ├───────▶ SET_IV    (restart the cipher stream)
//!                        ├───────▶ CIPHER    (encrypt: transform → device write
//!                        │                    decrypt: device read → transform)
//!                        └───────▶ WRITE_RAW / READ_RAW (sealed-store admin)
//! ```
//!
//! Both external collaborators are narrow traits ([`store::SecureStore`],
//! [`device::StorageDevice`]) so the core runs against in-memory fakes in tests;
//! no trusted-execution runtime is required.
//!
//! # Security
//!
//! - Key material never crosses the untrusted boundary on the cipher path;
//!   it is sealed via `WRITE_RAW` and loaded internally.
//! - Callers hold generation-checked integer session handles, never
//!   references into service state.
//! - Every command is validated against the session's current state before
//!   the cipher engine is touched.
//! - Errors carry an origin so "rejected by this service" is
//!   distinguishable from "rejected downstream".

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod chaos;
mod error;
mod iv;
mod keyload;
mod prepare;
mod service;
mod session;

pub mod device;
pub mod store;

pub use error::{ErrorKind, ErrorOrigin, ServiceError};
pub use keyload::SEALED_KEY_ID;
pub use service::CipherService;
pub use session::{CipherSession, SessionArena, SessionHandle};
