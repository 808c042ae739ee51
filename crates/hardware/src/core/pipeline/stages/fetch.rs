//! Instruction Fetch (IF) Stage.
//!
//! Reads the word at the current PC out of the core's private instruction
//! memory, decodes it into the IF slot, and advances the PC by one word. The
//! stage idles while the core is halted, while `HALT` has shut fetch down,
//! while the previous fetch has not been pulled by decode, or while decode
//! signalled backpressure at the last clock edge. The PC runs off the end of
//! the instruction memory rather than wrapping; a taken branch is what brings
//! it back in range.

use crate::common::constants::IMEM_WORDS;
use crate::core::Core;
use crate::core::pipeline::PipeSlot;
use crate::isa::Instruction;

/// Executes the fetch stage for one cycle.
pub fn fetch_stage(core: &mut Core) {
    if core.halted || core.halt_fetch {
        return;
    }
    if core.pipeline.fetch.valid || core.pipeline.fetch.stall {
        return;
    }
    let pc = core.pc;
    if pc as usize >= IMEM_WORDS {
        return;
    }

    core.pipeline.fetch = PipeSlot {
        valid: true,
        pc,
        inst: Instruction::decode(core.imem[pc as usize]),
        ..PipeSlot::default()
    };
    core.pc = pc + 1;
}
