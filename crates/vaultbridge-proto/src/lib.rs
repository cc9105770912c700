//! Vaultbridge Command Surface
//!
//! Wire-level vocabulary shared between the cipher service and its callers:
//! opcodes, tagged parameter slots, and the declared slot signature for each
//! opcode.
//!
//! A command invocation is an opcode plus exactly four parameter slots. Each
//! slot is tagged as a scalar value input, a buffer input, a buffer output,
//! or explicitly unused. The service dispatcher compares the tag combination
//! against the opcode's declared signature before any handler runs; this
//! crate only describes the shapes, it never validates session state or
//! touches key material.
//!
//! # Security
//!
//! Key bytes travel through `In` slots exactly once (the administrative
//! sealing command). `Debug` implementations for slots print lengths, never
//! contents, so tracing a command cannot leak key material into logs.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod opcode;
mod params;

pub use opcode::{Opcode, SignatureMismatch};
pub use params::{OutBuf, Param, ParamKind, Params};
