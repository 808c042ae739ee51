//! One processor core: pipeline, registers, private memories.
//!
//! A core owns its architectural state (PC, register file), its private
//! instruction memory, its MESI data cache, the five pipeline latch slots,
//! and its statistics and trace buffer. Each tick the stages run
//! downstream-first (WB, MEM, EX, ID, IF) and a bookkeeping pass then applies
//! the latched register write, redirects the PC of a resolved branch,
//! recomputes the backpressure flags, and records the cycle's trace line.

/// Private MESI data cache.
pub mod cache;
/// Pipeline latches and stages.
pub mod pipeline;
/// Architectural register file.
pub mod regfile;

use std::fmt::Write as _;

use crate::common::constants::{BLOCK_WORDS, IMEM_WORDS, NUM_REGISTERS};
use crate::core::cache::offset_of;
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage};
use crate::core::pipeline::{PipeSlot, Pipeline};
use crate::core::regfile::RegisterFile;
use crate::soc::bus::{BusArbiter, BusCmd, BusTransaction};
use crate::stats::CoreStats;

pub use cache::{DataCache, MesiState};

/// One of the four processor cores.
#[derive(Clone, Debug)]
pub struct Core {
    /// Core id, 0..=3; doubles as the bus requester id.
    pub id: usize,
    /// Program counter, a 10-bit word address.
    pub pc: u16,
    /// Architectural register file.
    pub regs: RegisterFile,
    /// Private instruction memory, 1024 words.
    pub imem: [u32; IMEM_WORDS],
    /// Private data cache.
    pub cache: DataCache,
    /// The five pipeline latch slots.
    pub pipeline: Pipeline,
    /// The core has committed `HALT`.
    pub halted: bool,
    /// `HALT` reached decode; no further instructions are fetched.
    pub halt_fetch: bool,
    /// A branch resolved this cycle; the PC is redirected at end of cycle.
    pub branch_pending: bool,
    /// Target of the pending branch.
    pub branch_target: u16,
    /// Register write latched in WB, applied at end of cycle.
    pub pending_write: Option<(u8, u32)>,
    /// `HALT` committed this cycle; `halted` latches at end of cycle.
    pub halt_commit: bool,
    /// Per-core statistics.
    pub stats: CoreStats,
    /// Buffered execution trace lines.
    pub trace: Vec<String>,
}

impl Core {
    /// Creates core `id` with zeroed state.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            pc: 0,
            regs: RegisterFile::new(),
            imem: [0; IMEM_WORDS],
            cache: DataCache::new(),
            pipeline: Pipeline::default(),
            halted: false,
            halt_fetch: false,
            branch_pending: false,
            branch_target: 0,
            pending_write: None,
            halt_commit: false,
            stats: CoreStats::default(),
            trace: Vec::new(),
        }
    }

    /// Accepts one word of a bus Flush. Only the transaction owner writes its
    /// cache; the final word of the block releases the MEM-stage stall so the
    /// commit logic can pick the instruction up this same cycle.
    pub fn handle_bus_word(
        &mut self,
        trans: &BusTransaction,
        is_owner: bool,
        origin: BusCmd,
        shared_at_request: bool,
    ) {
        if !is_owner {
            return;
        }
        self.cache
            .fill_word(trans.addr, trans.data, origin, shared_at_request);
        if offset_of(trans.addr) == BLOCK_WORDS - 1 {
            self.pipeline.mem.internal_stall = false;
        }
    }

    /// End-of-cycle bookkeeping: commit the latched register write, redirect
    /// a pending branch, propagate backpressure, record the trace line, and
    /// latch the halt.
    fn end_of_cycle(&mut self, cycle: u64) {
        if let Some((reg, value)) = self.pending_write.take() {
            self.regs.write(reg, value);
        }
        if self.branch_pending {
            self.pc = self.branch_target;
            self.branch_pending = false;
        }

        let p = &mut self.pipeline;
        p.mem.stall = p.mem.internal_stall;
        p.execute.stall = p.mem.internal_stall;
        p.decode.stall = (p.execute.valid && p.execute.stall) || p.decode.internal_stall;
        p.fetch.stall = p.decode.valid && p.decode.stall;

        if !self.halted {
            self.record_trace(cycle);
            self.stats.cycles += 1;
        }
        if self.halt_commit {
            self.halted = true;
            self.halt_commit = false;
        }
    }

    /// Appends this cycle's trace line: cycle number, the PC in each stage
    /// (`---` for an empty slot), and R2..R15 after the cycle's commit.
    fn record_trace(&mut self, cycle: u64) {
        let mut line = String::with_capacity(160);
        let _ = write!(line, "{cycle}");

        push_stage_pc(&mut line, &self.pipeline.fetch, self.if_idle_pc());
        for slot in [
            &self.pipeline.decode,
            &self.pipeline.execute,
            &self.pipeline.mem,
            &self.pipeline.writeback,
        ] {
            push_stage_pc(&mut line, slot, None);
        }

        for reg in 2..NUM_REGISTERS {
            let _ = write!(line, " {:08X}", self.regs.get(reg));
        }
        self.trace.push(line);
    }

    /// PC shown in the IF column while the slot is empty: the fetch address
    /// of the next cycle, as long as the core is still fetching.
    fn if_idle_pc(&self) -> Option<u16> {
        (!self.halt_fetch && (self.pc as usize) < IMEM_WORDS).then_some(self.pc)
    }
}

/// Writes one stage column: the slot's PC, a fallback PC, or `---`.
fn push_stage_pc(line: &mut String, slot: &PipeSlot, idle_pc: Option<u16>) {
    if slot.valid {
        let _ = write!(line, " {:03X}", slot.pc);
    } else if let Some(pc) = idle_pc {
        let _ = write!(line, " {pc:03X}");
    } else {
        line.push_str(" ---");
    }
}

/// Advances one core by one cycle. Stages run downstream-first so each reads
/// the state left by the previous clock edge.
pub fn core_cycle(core: &mut Core, bus: &mut BusArbiter, cycle: u64) {
    wb_stage(core);
    mem_stage(core, bus);
    execute_stage(core);
    decode_stage(core);
    fetch_stage(core);
    core.end_of_cycle(cycle);
}
