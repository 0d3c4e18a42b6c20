//! Fatal error conditions the core can surface.
//!
//! All three are fatal in the sense that the CPU or bus cannot sensibly
//! continue past them; the host decides whether to abort or merely log and
//! carry on (see `CoreError::ReadOnlyWrite`, which a well-behaved ROM never
//! triggers but which this core does not treat as unrecoverable).

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Copy, Clone)]
pub enum CoreError {
    /// The fetched opcode byte has no entry in the opcode table.
    #[error("unknown opcode ${byte:02X} at ${pc:04X}")]
    UnknownOpcode { pc: u16, byte: u8 },

    /// A cartridge read targeted an address below its mapped window.
    #[error("cartridge read out of range: ${0:04X}")]
    AddressOutOfRange(u16),

    /// A write landed in cartridge (ROM) space.
    #[error("write into read-only cartridge space: ${0:04X}")]
    ReadOnlyWrite(u16),
}
