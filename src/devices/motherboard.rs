//! The concrete CPU-visible bus: RAM + cartridge + PPU stub wired through
//! `cpu_memory_map`.
//!
//! Grounded on the teacher's `devices/nes.rs`, which implements `Motherboard`
//! over `{cpu, ppu, ram, cart}`. This type drops the `cpu`/`ppu`-internals
//! half of that struct (the CPU owns its own state and holds this bus; the
//! PPU is the register stub, not a renderer) and keeps the dispatch-by-
//! `cpu_memory_map::Device` shape.

use crate::devices::bus::{cpu_memory_map::Device, BusDevice, BusPeekResult, Motherboard};
use crate::devices::cartridge::NromCartridge;
use crate::devices::ppu_stub::PpuStub;
use crate::devices::ram::Ram;
use crate::error::CoreError;

pub struct Bus {
    ram: Ram,
    cartridge: NromCartridge,
    ppu: PpuStub,
    last_bus_value: u8,
}

impl Bus {
    pub fn new(cartridge: NromCartridge) -> Bus {
        Bus {
            ram: Ram::new(),
            cartridge,
            ppu: PpuStub::new(),
            last_bus_value: 0,
        }
    }

    pub fn ppu(&self) -> &PpuStub {
        &self.ppu
    }
}

impl Motherboard for Bus {
    fn read(&mut self, addr: u16) -> u8 {
        let (device, local) = crate::devices::bus::cpu_memory_map::match_addr(addr);
        let value = match device {
            Device::Ram => self.ram.read(local, self.last_bus_value),
            Device::Cartridge => self.cartridge.read(local, self.last_bus_value),
            Device::PpuPort => self.ppu.read(local, self.last_bus_value),
            Device::ApuIoPort | Device::Unmapped => self.last_bus_value,
        };
        self.last_bus_value = value;
        value
    }

    fn peek(&self, addr: u16) -> Option<u8> {
        let (device, local) = crate::devices::bus::cpu_memory_map::match_addr(addr);
        match device {
            Device::Ram => self.ram.peek(local).to_optional(),
            Device::Cartridge => self.cartridge.peek(local).to_optional(),
            Device::PpuPort => match self.ppu.peek(local) {
                BusPeekResult::Result(v) => Some(v),
                _ => None,
            },
            Device::ApuIoPort | Device::Unmapped => None,
        }
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<(), CoreError> {
        let (device, local) = crate::devices::bus::cpu_memory_map::match_addr(addr);
        match device {
            Device::Ram => self.ram.write(local, data),
            Device::Cartridge => return Err(CoreError::ReadOnlyWrite(addr)),
            Device::PpuPort => self.ppu.write(local, data),
            Device::ApuIoPort | Device::Unmapped => {}
        }
        self.last_bus_value = data;
        Ok(())
    }
}
