//! In-memory EEPROM for testing and simulation.

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::{DeviceConnection, DeviceError, EEPROM_SELECT, StorageDevice};

/// Capacity of the simulated EEPROM: the full 16-bit offset space.
const EEPROM_SIZE: usize = 64 * 1024;

/// In-memory [`StorageDevice`] implementation.
///
/// Models a single EEPROM answering at [`EEPROM_SELECT`]. Cells live behind
/// `Arc<Mutex<_>>` so clones address the same device, the way two service
/// instances contend on one physical part. Unwritten cells read as zero.
/// Uses `lock().expect()` which will panic if the mutex is poisoned -
/// acceptable for test code.
#[derive(Clone)]
pub struct MemoryEeprom {
    cells: Arc<Mutex<Vec<u8>>>,
}

impl MemoryEeprom {
    /// Create a zero-filled 64 KiB EEPROM.
    pub fn new() -> Self {
        Self { cells: Arc::new(Mutex::new(vec![0u8; EEPROM_SIZE])) }
    }

    /// Raw cell contents in `[offset, offset + len)`, for test assertions.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned or the range is out of
    /// bounds. This is acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn snapshot(&self, offset: u16, len: usize) -> Vec<u8> {
        let cells = self.cells.lock().expect("Mutex poisoned");
        cells[offset as usize..offset as usize + len].to_vec()
    }
}

impl Default for MemoryEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageDevice for MemoryEeprom {
    type Conn = MemoryEepromConn;

    fn open(&self) -> Result<Self::Conn, DeviceError> {
        // Bus controller init happens at session open on the real service.
        debug!("memory eeprom: bus initialized");
        Ok(MemoryEepromConn { cells: Arc::clone(&self.cells) })
    }
}

/// One open connection to the in-memory EEPROM.
#[derive(Debug)]
pub struct MemoryEepromConn {
    cells: Arc<Mutex<Vec<u8>>>,
}

impl MemoryEepromConn {
    fn check_range(offset: u16, len: usize) -> Result<(), DeviceError> {
        if offset as usize + len > EEPROM_SIZE {
            return Err(DeviceError::OutOfRange { offset, len, size: EEPROM_SIZE });
        }
        Ok(())
    }

    fn check_select(select: u8) -> Result<(), DeviceError> {
        if select != EEPROM_SELECT {
            return Err(DeviceError::NoDevice { select });
        }
        Ok(())
    }
}

impl DeviceConnection for MemoryEepromConn {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn write(&mut self, select: u8, offset: u16, data: &[u8]) -> Result<(), DeviceError> {
        Self::check_select(select)?;
        Self::check_range(offset, data.len())?;

        let mut cells = self.cells.lock().expect("Mutex poisoned");
        cells[offset as usize..offset as usize + data.len()].copy_from_slice(data);

        debug!(offset, len = data.len(), "memory eeprom: write");
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. This is acceptable for
    /// test code.
    #[allow(clippy::expect_used)]
    fn read(&mut self, select: u8, offset: u16, dest: &mut [u8]) -> Result<usize, DeviceError> {
        Self::check_select(select)?;
        Self::check_range(offset, dest.len())?;

        let cells = self.cells.lock().expect("Mutex poisoned");
        dest.copy_from_slice(&cells[offset as usize..offset as usize + dest.len()]);

        debug!(offset, len = dest.len(), "memory eeprom: read");
        Ok(dest.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_roundtrip() {
        let eeprom = MemoryEeprom::new();
        let mut conn = eeprom.open().unwrap();

        conn.write(EEPROM_SELECT, 0x0100, &[1, 2, 3, 4]).unwrap();

        let mut dest = [0u8; 4];
        let len = conn.read(EEPROM_SELECT, 0x0100, &mut dest).unwrap();
        assert_eq!(len, 4);
        assert_eq!(dest, [1, 2, 3, 4]);
    }

    #[test]
    fn unwritten_cells_read_zero() {
        let eeprom = MemoryEeprom::new();
        let mut conn = eeprom.open().unwrap();

        let mut dest = [0xFFu8; 8];
        conn.read(EEPROM_SELECT, 0x2000, &mut dest).unwrap();
        assert_eq!(dest, [0u8; 8]);
    }

    #[test]
    fn wrong_select_address_is_rejected() {
        let eeprom = MemoryEeprom::new();
        let mut conn = eeprom.open().unwrap();

        let err = conn.write(0x51, 0, &[1]).unwrap_err();
        assert_eq!(err, DeviceError::NoDevice { select: 0x51 });
    }

    #[test]
    fn transfer_past_the_end_is_rejected() {
        let eeprom = MemoryEeprom::new();
        let mut conn = eeprom.open().unwrap();

        let err = conn.write(EEPROM_SELECT, u16::MAX, &[1, 2]).unwrap_err();
        assert_eq!(err, DeviceError::OutOfRange { offset: u16::MAX, len: 2, size: EEPROM_SIZE });
    }

    #[test]
    fn clones_address_the_same_device() {
        let eeprom = MemoryEeprom::new();
        let clone = eeprom.clone();

        let mut writer = eeprom.open().unwrap();
        writer.write(EEPROM_SELECT, 0, &[0xAB]).unwrap();

        let mut reader = clone.open().unwrap();
        let mut dest = [0u8; 1];
        reader.read(EEPROM_SELECT, 0, &mut dest).unwrap();
        assert_eq!(dest, [0xAB]);
    }
}
