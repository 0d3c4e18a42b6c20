//! The PPU register-port stub (spec §4.2, §9 Open Question).
//!
//! The bus needs somewhere concrete to route `$2000-$3FFF`; this core does
//! not model PPU rendering state at all (spec §1 Non-goals). Grounded on the
//! teacher's `devices/ppu/structs.rs` `PpuControlFlags`/`PpuMaskFlags` types,
//! trimmed to just the two flag registers a host might want to observe —
//! every other port is a bare no-op returning the last bus value, per
//! SPEC_FULL §9's resolution of the PPU Open Question.

use crate::devices::bus::{BusDevice, BusPeekResult};
use crate::devices::flags::{PpuControl, PpuMask};

/// Register indices within the 8-port PPU window (`addr % 8`).
const PPUCTRL: u16 = 0;
const PPUMASK: u16 = 1;

pub struct PpuStub {
    control: PpuControl,
    mask: PpuMask,
}

impl PpuStub {
    pub fn new() -> PpuStub {
        PpuStub {
            control: PpuControl::empty(),
            mask: PpuMask::empty(),
        }
    }

    pub fn control(&self) -> PpuControl {
        self.control
    }

    pub fn mask(&self) -> PpuMask {
        self.mask
    }
}

impl Default for PpuStub {
    fn default() -> PpuStub {
        PpuStub::new()
    }
}

impl BusDevice for PpuStub {
    fn read(&mut self, _addr: u16, last_bus_value: u8) -> u8 {
        // No port on a real PPU is this permissive, but without rendering
        // state there's nothing honest to return beyond the bus's last value.
        last_bus_value
    }

    fn peek(&self, _addr: u16) -> BusPeekResult {
        BusPeekResult::MutableRead
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr % 8 {
            PPUCTRL => self.control = PpuControl::from_bits_truncate(value),
            PPUMASK => self.mask = PpuMask::from_bits_truncate(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_ppuctrl_is_observable() {
        let mut ppu = PpuStub::new();
        ppu.write(0x2000, 0x80);
        assert!(ppu.control().contains(PpuControl::VBLANK_NMI_ENABLE));
    }

    #[test]
    fn reads_fall_back_to_last_bus_value() {
        let mut ppu = PpuStub::new();
        assert_eq!(ppu.read(0x2002, 0x5A), 0x5A);
    }
}
