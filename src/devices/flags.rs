//! Bit-flag register types.
//!
//! A single 8-bit cell with named single-bit accessors, backing both the CPU
//! status register and the PPU control/mask register stubs. Built on the
//! same `bitflags!` macro the teacher uses for `Status` and its PPU flag
//! types (`devices/ppu/structs.rs` upstream); there is no invariant enforced
//! here beyond masking to 8 bits; the "bit 5 always set" rule on the CPU
//! status register is enforced at the `Status` call sites, not in this
//! macro-generated type itself.

bitflags! {
    pub struct Status: u8 {
        const CARRY      = 0x01;
        const ZERO       = 0x02;
        const IRQ_DISABLE = 0x04;
        const DECIMAL    = 0x08;
        const BREAK      = 0x10;
        const UNUSED     = 0x20;
        const OVERFLOW   = 0x40;
        const NEGATIVE   = 0x80;
    }
}

bitflags! {
    /// Bitmasks for the handful of `$PPUCTRL` fields the register stub cares
    /// to expose. No rendering semantics attach to these bits; the stub just
    /// remembers what was last written so a host can observe it.
    pub struct PpuControl: u8 {
        const NAMETABLE_BASE_SELECT = 0x03;
        const VRAM_INCREMENT_SELECT = 0x04;
        const SPRITE_TILE_SELECT    = 0x08;
        const BG_TILE_SELECT        = 0x10;
        const SPRITE_MODE_SELECT    = 0x20;
        const VBLANK_NMI_ENABLE     = 0x80;
    }
}

bitflags! {
    /// Bitmasks for the handful of `$PPUMASK` fields the register stub cares
    /// to expose.
    pub struct PpuMask: u8 {
        const USE_GRAYSCALE    = 0x01;
        const BG_LEFT_ENABLE   = 0x02;
        const SPRITE_LEFT_ENABLE = 0x04;
        const BG_ENABLE        = 0x08;
        const SPRITE_ENABLE    = 0x10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_masks_to_eight_bits() {
        let s = Status::from_bits_truncate(0xFF);
        assert_eq!(s.bits(), 0xFF);
    }

    #[test]
    fn status_contains_reflects_individual_bits() {
        let s = Status::CARRY | Status::ZERO;
        assert!(s.contains(Status::CARRY));
        assert!(s.contains(Status::ZERO));
        assert!(!s.contains(Status::NEGATIVE));
    }

    #[test]
    fn ppu_control_exposes_nmi_enable_bit() {
        let ctrl = PpuControl::from_bits_truncate(0x80);
        assert!(ctrl.contains(PpuControl::VBLANK_NMI_ENABLE));
    }
}
