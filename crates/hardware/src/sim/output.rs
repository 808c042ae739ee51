//! Output dump writers.
//!
//! Every result of a run is a plain text file of uppercase, zero-padded hex
//! words (or `name value` pairs for statistics). Each writer renders its file
//! into a string and writes it in one shot; the trace writers simply join the
//! lines buffered during simulation.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::common::constants::{CACHE_SETS, CACHE_WORDS, NUM_CORES, NUM_REGISTERS};
use crate::common::{Result, SimError};
use crate::config::FileSet;
use crate::core::Core;
use crate::core::cache::DataCache;
use crate::sim::Simulator;
use crate::soc::bus::BusArbiter;
use crate::soc::memory::MainMemory;

/// Memory dumps always cover at least this many leading words.
const MEMOUT_MIN_WORDS: usize = 64;

fn write_file(path: &Path, body: &str) -> Result<()> {
    fs::write(path, body).map_err(|e| SimError::io(path, e))
}

/// Writes the main memory dump: every word through the last non-zero one,
/// never fewer than 64 lines.
pub fn save_memout(path: &Path, memory: &MainMemory) -> Result<()> {
    let words = memory.words();
    let last_nonzero = words.iter().rposition(|&w| w != 0).unwrap_or(0);
    let count = (last_nonzero + 1).max(MEMOUT_MIN_WORDS);
    let mut body = String::with_capacity(count * 9);
    for &word in &words[..count] {
        let _ = writeln!(body, "{word:08X}");
    }
    write_file(path, &body)
}

/// Writes one core's register dump: R2..R15, one word per line.
pub fn save_regout(path: &Path, core: &Core) -> Result<()> {
    let mut body = String::new();
    for reg in 2..NUM_REGISTERS {
        let _ = writeln!(body, "{:08X}", core.regs.get(reg));
    }
    write_file(path, &body)
}

/// Writes one core's execution trace.
pub fn save_trace(path: &Path, core: &Core) -> Result<()> {
    write_lines(path, &core.trace)
}

/// Writes the bus trace.
pub fn save_bustrace(path: &Path, bus: &BusArbiter) -> Result<()> {
    write_lines(path, bus.trace_lines())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut body = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    write_file(path, &body)
}

/// Writes one cache's data array: 512 words.
pub fn save_dsram(path: &Path, cache: &DataCache) -> Result<()> {
    let mut body = String::with_capacity(CACHE_WORDS * 9);
    for idx in 0..CACHE_WORDS {
        let _ = writeln!(body, "{:08X}", cache.dsram_word(idx));
    }
    write_file(path, &body)
}

/// Writes one cache's tag array: 64 packed words with the MESI state in bits
/// `[13:12]` and the tag in bits `[11:0]`.
pub fn save_tsram(path: &Path, cache: &DataCache) -> Result<()> {
    let mut body = String::with_capacity(CACHE_SETS * 9);
    for idx in 0..CACHE_SETS {
        let entry = cache.tsram_entry(idx);
        let packed = (entry.state as u32) << 12 | u32::from(entry.tag) & 0xFFF;
        let _ = writeln!(body, "{packed:08X}");
    }
    write_file(path, &body)
}

/// Writes one core's statistics file.
pub fn save_stats(path: &Path, core: &Core) -> Result<()> {
    write_file(path, &core.stats.render())
}

/// Writes every output file of a finished run.
pub fn write_all(files: &FileSet, sim: &Simulator) -> Result<()> {
    save_memout(&files.memout, &sim.memory)?;
    for i in 0..NUM_CORES {
        save_regout(&files.regout[i], &sim.cores[i])?;
        save_trace(&files.core_trace[i], &sim.cores[i])?;
        save_dsram(&files.dsram[i], &sim.cores[i].cache)?;
        save_tsram(&files.tsram[i], &sim.cores[i].cache)?;
        save_stats(&files.stats[i], &sim.cores[i])?;
    }
    save_bustrace(&files.bus_trace, &sim.bus)
}
