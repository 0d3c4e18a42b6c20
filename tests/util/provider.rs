//! Test-only iNES loader, mirroring `demos/nestest_runner.rs`'s header strip
//! (spec §6: ROM parsing is a driver/test-harness concern, not a core one).
//! Grounded on the teacher's `tests/util/provider.rs`, which plays the same
//! role for its own `tests/nestest.rs`.

use std::fs;
use std::path::Path;

const INES_HEADER_LEN: usize = 16;
const PRG_BANK_LEN: usize = 0x4000;

/// Load a `.nes` image and return its raw PRG bytes (NROM only), or `None`
/// if the fixture isn't present — callers should skip rather than fail.
pub fn load_prg(path: impl AsRef<Path>) -> Option<Vec<u8>> {
    let image = fs::read(path).ok()?;
    if image.len() < INES_HEADER_LEN + PRG_BANK_LEN || &image[0..4] != b"NES\x1A" {
        return None;
    }
    let mapper = (image[6] >> 4) | (image[7] & 0xF0);
    if mapper != 0 {
        return None;
    }
    let prg_banks = if image[4] == 0 { 1 } else { image[4] as usize };
    let start = INES_HEADER_LEN;
    Some(image[start..start + prg_banks * PRG_BANK_LEN].to_vec())
}

/// Load the companion `nestest.log` reference trace, one line per
/// instruction, if present.
pub fn load_reference_log(path: impl AsRef<Path>) -> Option<Vec<String>> {
    let text = fs::read_to_string(path).ok()?;
    Some(text.lines().map(str::to_string).collect())
}
