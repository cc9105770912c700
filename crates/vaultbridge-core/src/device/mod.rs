//! Storage-device service abstraction.
//!
//! The EEPROM is reachable only through a second, independent service that
//! drives the physical bus. This module consumes that service's contract
//! (two commands: write and read, each addressed by a 7-bit device-select
//! plus a 16-bit offset) without specifying its bus-level behavior.
//!
//! The cipher bridge opens a fresh connection for every CIPHER command and
//! drops it before returning. Connections are not pooled: the extra
//! open/close latency buys isolation and crash-containment between the two
//! services.

mod error;
mod flaky;
mod memory;

pub use error::DeviceError;
pub use flaky::FlakyDevice;
pub use memory::MemoryEeprom;

/// 7-bit device-select address of the EEPROM on the storage bus.
pub const EEPROM_SELECT: u8 = 80;

/// Factory for connections to the storage-device service.
pub trait StorageDevice {
    /// Connection type handed out by [`open`](Self::open).
    type Conn: DeviceConnection;

    /// Open a connection and initialize the bus.
    ///
    /// Blocks until the device service accepts the session.
    fn open(&self) -> Result<Self::Conn, DeviceError>;
}

/// One open connection to the storage-device service.
///
/// Dropping the connection closes it. Both calls block until the physical
/// transfer completes; there is no timeout at this layer.
pub trait DeviceConnection {
    /// Write `data` to the device at `select`, starting at `offset`.
    fn write(&mut self, select: u8, offset: u16, data: &[u8]) -> Result<(), DeviceError>;

    /// Fill `dest` from the device at `select`, starting at `offset`.
    /// Returns the number of bytes read.
    fn read(&mut self, select: u8, offset: u16, dest: &mut [u8]) -> Result<usize, DeviceError>;
}
