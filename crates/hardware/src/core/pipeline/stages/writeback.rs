//! Writeback (WB) Stage.
//!
//! Commits in program order. The register write is latched here and applied
//! to the architectural file at the end of the cycle. A load re-probes the
//! cache on commit: when a fill lands and releases the MEM stall in the same
//! cycle, the latched `mem_data` predates the fill, and the re-probe picks up
//! the freshly filled word instead. An instruction occupies WB for exactly
//! one cycle; the slot self-clears at the next tick.

use crate::common::constants::WORD_ADDR_MASK;
use crate::core::Core;
use crate::core::pipeline::take;

/// Executes the writeback stage for one cycle.
pub fn wb_stage(core: &mut Core) {
    core.pipeline.writeback.valid = false;

    if !core.pipeline.mem.valid || core.pipeline.mem.internal_stall {
        return;
    }
    let mut slot = take(&mut core.pipeline.mem);

    if slot.inst.is_load() {
        if let Some(word) = core.cache.peek(slot.alu_result & WORD_ADDR_MASK) {
            slot.mem_data = word;
        }
    }

    if slot.reg_write {
        let value = if slot.inst.is_load() {
            slot.mem_data
        } else {
            slot.alu_result
        };
        core.pending_write = Some((slot.rw, value));
    }

    core.stats.instructions += 1;
    if slot.is_halt {
        core.halt_commit = true;
    }

    core.pipeline.writeback = slot;
}
