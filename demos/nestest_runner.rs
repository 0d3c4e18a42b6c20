//! Demo driver: load an iNES `.nes` image, strip its header (a driver
//! concern per spec §6 — the core only ever sees a raw PRG slice), pin PC to
//! `$C000` (the `nestest` automation entry point), and print one
//! `trace_line()` per `step()`.
//!
//! Grounded on the teacher's `cartridge/ines.rs` header parser (relocated
//! here, since SPEC_FULL §4.4 moves ROM parsing out of the core crate) and
//! its `bindings`/driver-layer use of the core API.

use std::env;
use std::fs;
use std::process::ExitCode;

use defenestrate_core::{Bus, Cpu, NromCartridge};

const INES_HEADER_LEN: usize = 16;
const PRG_BANK_LEN: usize = 0x4000;
const NESTEST_ENTRY_POINT: u16 = 0xC000;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args();
    let _argv0 = args.next();
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: nestest-runner <path-to.nes>");
            return ExitCode::FAILURE;
        }
    };

    let image = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let prg = match strip_ines_header(&image) {
        Ok(prg) => prg,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = Cpu::new(Bus::new(NromCartridge::new(prg)));
    cpu.set_pc(NESTEST_ENTRY_POINT);

    loop {
        match cpu.step() {
            Ok(_) => {
                if let Some(line) = cpu.trace_line() {
                    println!("{line}");
                }
            }
            Err(err) => {
                log::warn!("halted: {err}");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Strip the 16-byte iNES header and return the first PRG bank. Only the
/// NROM mapper (mapper number 0) is supported, matching this core's
/// cartridge component.
fn strip_ines_header(image: &[u8]) -> Result<Vec<u8>, String> {
    if image.len() < INES_HEADER_LEN + PRG_BANK_LEN || &image[0..4] != b"NES\x1A" {
        return Err("not a valid iNES image".to_string());
    }
    let prg_banks = if image[4] == 0 { 1 } else { image[4] as usize };
    let mapper = (image[6] >> 4) | (image[7] & 0xF0);
    if mapper != 0 {
        return Err(format!("unsupported mapper {mapper}; this core only implements NROM"));
    }
    let prg_len = prg_banks * PRG_BANK_LEN;
    let start = INES_HEADER_LEN;
    Ok(image[start..start + prg_len].to_vec())
}
