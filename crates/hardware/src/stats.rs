//! Per-core statistics collection and reporting.
//!
//! Each core tracks its own counters; nothing is global. `cycles` advances on
//! every tick the core has not yet halted, `instructions` on every WB commit.
//! The hit/miss counters record the first probe of each memory instruction
//! only, while `decode_stall` and `mem_stall` accumulate one count per
//! stalled cycle.

use std::fmt::Write as _;

/// Counters one core accumulates over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoreStats {
    /// Ticks elapsed before the core halted.
    pub cycles: u64,
    /// Instructions committed in WB.
    pub instructions: u64,
    /// Loads whose first cache probe hit.
    pub read_hit: u64,
    /// Stores whose first cache probe hit.
    pub write_hit: u64,
    /// Loads whose first cache probe missed.
    pub read_miss: u64,
    /// Stores whose first cache probe missed.
    pub write_miss: u64,
    /// Cycles the decode stage stalled on a data hazard.
    pub decode_stall: u64,
    /// Cycles the memory stage stalled on a cache miss.
    pub mem_stall: u64,
}

impl CoreStats {
    /// Renders the statistics file body: `name value` per line, decimal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "cycles {}", self.cycles);
        let _ = writeln!(out, "instructions {}", self.instructions);
        let _ = writeln!(out, "read_hit {}", self.read_hit);
        let _ = writeln!(out, "write_hit {}", self.write_hit);
        let _ = writeln!(out, "read_miss {}", self.read_miss);
        let _ = writeln!(out, "write_miss {}", self.write_miss);
        let _ = writeln!(out, "decode_stall {}", self.decode_stall);
        let _ = writeln!(out, "mem_stall {}", self.mem_stall);
        out
    }
}
