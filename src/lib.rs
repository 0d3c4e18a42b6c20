//! `defenestrate-core`: a cycle-aware MOS 6502 interpreter and the address
//! bus it needs to reach RAM, an NROM cartridge, and register-stub
//! peripherals. See `SPEC_FULL.md` for the full component breakdown.

#[macro_use]
extern crate bitflags;

pub mod devices;
pub mod error;

pub use devices::bus::Motherboard;
pub use devices::cartridge::NromCartridge;
pub use devices::cpu::{AddressingMode, Cpu, Instruction};
pub use devices::motherboard::Bus;
pub use devices::ppu_stub::PpuStub;
pub use error::CoreError;
