//! NROM cartridge (spec §4.3).
//!
//! Grounded on the teacher's `devices/cartridge/nrom.rs`. The teacher's
//! `NROMCartridge` also carries CHR-ROM and a nametable mirroring mode for
//! the PPU; both are dropped here since the PPU is out of scope and the bus
//! only ever routes CPU-space addresses (`$4020-$FFFF`) to this type.

use crate::devices::bus::{BusDevice, BusPeekResult};
use crate::error::CoreError;

const PRG_BANK_SIZE: usize = 0x4000;
const PRG_WINDOW_START: u16 = 0x8000;

/// A fixed 16 KiB PRG-ROM image, mirrored across `$8000-$FFFF`.
pub struct NromCartridge {
    prg: Vec<u8>,
}

impl NromCartridge {
    /// Build a cartridge from a raw PRG-ROM byte slice (no iNES header —
    /// that is stripped by the driver before this constructor is called).
    /// The slice is expected to be exactly one 16 KiB bank; if it's shorter
    /// it is mirrored to fill the bank, matching the teacher's handling of
    /// images produced without a trailing half-bank.
    pub fn new(prg: Vec<u8>) -> NromCartridge {
        assert!(!prg.is_empty(), "PRG-ROM image must not be empty");
        NromCartridge { prg }
    }

    fn local_offset(&self, addr: u16) -> Result<usize, CoreError> {
        if addr < PRG_WINDOW_START {
            return Err(CoreError::AddressOutOfRange(addr));
        }
        let offset = (addr - PRG_WINDOW_START) as usize % PRG_BANK_SIZE;
        Ok(offset % self.prg.len())
    }

    pub fn read_prg(&self, addr: u16) -> Result<u8, CoreError> {
        self.local_offset(addr).map(|offset| self.prg[offset])
    }
}

impl BusDevice for NromCartridge {
    fn read(&mut self, addr: u16, last_bus_value: u8) -> u8 {
        self.read_prg(addr).unwrap_or(last_bus_value)
    }

    fn peek(&self, addr: u16) -> BusPeekResult {
        match self.read_prg(addr) {
            Ok(val) => BusPeekResult::Result(val),
            Err(_) => BusPeekResult::Unmapped,
        }
    }

    fn write(&mut self, _addr: u16, _value: u8) {
        // ROM: writes are no-ops at this layer. The bus itself is
        // responsible for surfacing `CoreError::ReadOnlyWrite` to callers
        // that care, since `BusDevice::write` has no error channel.
    }
}
