//! End-to-end scenarios from spec §8, driven through the public bus-wired
//! CPU API rather than through any single module's unit tests.

use defenestrate_core::{Bus, Cpu, Motherboard, NromCartridge};

fn cpu_with_prg_at(load_addr: u16, bytes: &[u8]) -> Cpu<Bus> {
    let mut prg = vec![0u8; 0x4000];
    let offset = (load_addr - 0x8000) as usize;
    prg[offset..offset + bytes.len()].copy_from_slice(bytes);
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(load_addr);
    cpu
}

#[test]
fn reset_sequence_scenario() {
    let mut prg = vec![0u8; 0x4000];
    prg[0x3FFC] = 0x34;
    prg[0x3FFD] = 0x12;
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.reset();
    let regs = cpu.regs();
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(regs.sp, 0xFD);
    assert_eq!((regs.a, regs.x, regs.y), (0, 0, 0));
    assert_eq!(regs.p.bits(), 0x24);
    assert_eq!(cpu.cycles(), 0);
}

#[test]
fn adc_sbc_carry_chain_scenario() {
    // LDA #$FF; CLC; ADC #$01
    let mut cpu = cpu_with_prg_at(0x8000, &[0xA9, 0xFF, 0x18, 0x69, 0x01, 0x38, 0xE9, 0x01]);
    cpu.step().unwrap(); // LDA #$FF
    cpu.step().unwrap(); // CLC
    cpu.step().unwrap(); // ADC #$01
    let regs = cpu.regs();
    assert_eq!(regs.a, 0x00);
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::ZERO));
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::CARRY));
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::NEGATIVE));
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::OVERFLOW));

    cpu.step().unwrap(); // SEC
    cpu.step().unwrap(); // SBC #$01
    let regs = cpu.regs();
    assert_eq!(regs.a, 0xFF);
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::CARRY));
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::NEGATIVE));
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::OVERFLOW));
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::ZERO));
}

#[test]
fn jsr_rts_round_trip_restores_pc_and_sp() {
    // $8000: JSR $8004 ; $8003: BRK ; $8004: RTS
    let mut cpu = cpu_with_prg_at(0x8000, &[0x20, 0x04, 0x80, 0x00, 0x60]);
    let sp_before = cpu.regs().sp;
    cpu.step().unwrap(); // JSR
    cpu.step().unwrap(); // RTS
    assert_eq!(cpu.pc(), 0x8003);
    assert_eq!(cpu.regs().sp, sp_before);
}

#[test]
fn ram_mirrors_across_0x0800_windows() {
    let mut cpu = cpu_with_prg_at(0x8000, &[]);
    for i in 0u16..0x0800 {
        cpu.bus_mut().write(i, (i & 0xFF) as u8).unwrap();
    }
    for base in [0x0800u16, 0x1000, 0x1800] {
        for i in 0u16..0x0800 {
            assert_eq!(cpu.bus_mut().read(base + i), (i & 0xFF) as u8);
        }
    }
}

#[test]
fn jmp_indirect_page_wrap_bug() {
    let mut prg = vec![0u8; 0x4000];
    // JMP ($02FF) at $8000
    prg[0] = 0x6C;
    prg[1] = 0xFF;
    prg[2] = 0x02;
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(0x8000);
    cpu.bus_mut().write(0x02FF, 0x34).unwrap();
    cpu.bus_mut().write(0x0200, 0x12).unwrap();
    // A byte at $0300 that, if the bug were absent, would wrongly supply the
    // high byte.
    cpu.bus_mut().write(0x0300, 0xFF).unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x1234);
}

#[test]
fn branch_taken_across_a_page_costs_two_extra_cycles() {
    // BNE +$7F from $80F0 lands at $8171, crossing from page $80 to $81.
    let mut prg = vec![0u8; 0x4000];
    prg[0x00F0] = 0xD0; // BNE
    prg[0x00F1] = 0x7F;
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(0x80F0);
    // Z is clear after reset, so BNE is taken.
    let cycles = cpu.step().unwrap();
    assert_eq!(cycles, 4); // 2 base + 2 (taken + page cross)
    assert_eq!(cpu.pc(), 0x8171);
}

#[test]
fn branch_taken_within_same_page_costs_one_extra_cycle() {
    let mut prg = vec![0u8; 0x4000];
    prg[0] = 0xD0; // BNE
    prg[1] = 0x02;
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(0x8000);
    let cycles = cpu.step().unwrap();
    assert_eq!(cycles, 3);
    assert_eq!(cpu.pc(), 0x8004);
}

#[test]
fn dex_from_zero_wraps_to_ff_with_negative_set() {
    let mut cpu = cpu_with_prg_at(0x8000, &[0xCA]); // DEX
    cpu.step().unwrap();
    assert_eq!(cpu.regs().x, 0xFF);
    assert!(cpu.regs().p.contains(defenestrate_core::devices::flags::Status::NEGATIVE));
}

#[test]
fn rol_through_carry_clears_value_and_sets_carry_and_zero() {
    // LDA #$80; CLC; ROL A
    let mut cpu = cpu_with_prg_at(0x8000, &[0xA9, 0x80, 0x18, 0x2A]);
    cpu.step().unwrap();
    cpu.step().unwrap();
    cpu.step().unwrap();
    let regs = cpu.regs();
    assert_eq!(regs.a, 0x00);
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::CARRY));
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::ZERO));
}

#[test]
fn illegal_lax_loads_both_accumulator_and_x() {
    // LAX #... doesn't exist legally as immediate in the implemented set
    // (the real LAX has no immediate form); use LAX zero-page ($A7).
    let mut prg = vec![0u8; 0x4000];
    prg[0] = 0xA7; // LAX $10
    prg[1] = 0x10;
    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(0x8000);
    cpu.bus_mut().write(0x0010, 0x42).unwrap();
    cpu.step().unwrap();
    assert_eq!(cpu.regs().a, 0x42);
    assert_eq!(cpu.regs().x, 0x42);
}

#[test]
fn pha_pla_round_trip_preserves_accumulator() {
    // LDA #$7E; PHA; LDA #$00; PLA
    let mut cpu = cpu_with_prg_at(0x8000, &[0xA9, 0x7E, 0x48, 0xA9, 0x00, 0x68]);
    cpu.step().unwrap(); // LDA #$7E
    let sp_before = cpu.regs().sp;
    cpu.step().unwrap(); // PHA
    assert_eq!(cpu.regs().sp, sp_before.wrapping_sub(1));
    cpu.step().unwrap(); // LDA #$00
    assert_eq!(cpu.regs().a, 0x00);
    cpu.step().unwrap(); // PLA
    assert_eq!(cpu.regs().a, 0x7E);
    assert_eq!(cpu.regs().sp, sp_before);
}

#[test]
fn php_plp_round_trip_restores_flags_with_unused_bit_set() {
    // SEC; SED; PHP; CLC; CLD; PLP
    let mut cpu = cpu_with_prg_at(0x8000, &[0x38, 0xF8, 0x08, 0x18, 0xD8, 0x28]);
    cpu.step().unwrap(); // SEC
    cpu.step().unwrap(); // SED
    cpu.step().unwrap(); // PHP
    cpu.step().unwrap(); // CLC
    cpu.step().unwrap(); // CLD
    let regs = cpu.regs();
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::CARRY));
    assert!(!regs.p.contains(defenestrate_core::devices::flags::Status::DECIMAL));

    cpu.step().unwrap(); // PLP
    let regs = cpu.regs();
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::CARRY));
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::DECIMAL));
    assert!(regs.p.contains(defenestrate_core::devices::flags::Status::UNUSED));
}

#[test]
fn clc_is_idempotent() {
    // CLC; CLC
    let mut cpu = cpu_with_prg_at(0x8000, &[0x18, 0x18]);
    cpu.step().unwrap();
    let after_first = cpu.regs().p.bits();
    cpu.step().unwrap();
    assert_eq!(cpu.regs().p.bits(), after_first);
    assert!(!cpu.regs().p.contains(defenestrate_core::devices::flags::Status::CARRY));
}

#[test]
fn brk_pushes_the_incremented_pc_and_jumps_through_the_irq_vector() {
    // $8000: BRK ; $FFFE/$FFFF: IRQ vector -> $1234
    let mut cpu = cpu_with_prg_at(0x8000, &[0x00]);
    cpu.bus_mut().write(0xFFFE, 0x34).unwrap();
    cpu.bus_mut().write(0xFFFF, 0x12).unwrap();
    let sp_before = cpu.regs().sp;
    cpu.step().unwrap();
    assert_eq!(cpu.pc(), 0x1234);
    assert_eq!(cpu.regs().sp, sp_before.wrapping_sub(3));

    // The pushed return address is the byte past the BRK opcode itself:
    // high byte pushed first (at $01FD), low byte second (at $01FC).
    let pulled_hi = cpu.bus_mut().read(0x01FD);
    let pulled_lo = cpu.bus_mut().read(0x01FC);
    assert_eq!(u16::from(pulled_lo) | (u16::from(pulled_hi) << 8), 0x8001);
}

#[test]
fn cycle_counter_advances_by_exactly_the_step_return_value() {
    // LDA #$00; TAX; INX
    let mut cpu = cpu_with_prg_at(0x8000, &[0xA9, 0x00, 0xAA, 0xE8]);
    for _ in 0..3 {
        let before = cpu.cycles();
        let spent = cpu.step().unwrap() as u64;
        assert_eq!(cpu.cycles(), before + spent);
    }
}

#[test]
fn unknown_opcode_is_fatal_end_to_end() {
    let mut cpu = cpu_with_prg_at(0x8000, &[0x02]); // JAM
    let err = cpu.step().unwrap_err();
    assert_eq!(
        err,
        defenestrate_core::CoreError::UnknownOpcode { pc: 0x8000, byte: 0x02 }
    );
}
