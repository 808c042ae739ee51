//! Pipeline latches and stage sequencing.
//!
//! The five stages communicate through one latch slot each. Within a tick the
//! stages run downstream-first (WB, MEM, EX, ID, IF), so every stage reads
//! the state its upstream left at the previous clock edge and writes the
//! state the downstream stage observes on the next one. A slot becomes valid
//! when a stage pulls from upstream (clearing the upstream slot) and is
//! cleared when the downstream stage pulls it in turn.

/// The pipeline stage functions.
pub mod stages;

use crate::isa::Instruction;

/// One pipeline latch slot and the control state riding with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipeSlot {
    /// The slot holds an instruction.
    pub valid: bool,
    /// Backpressure from downstream, recomputed at end of cycle.
    pub stall: bool,
    /// This stage cannot make progress (hazard or cache miss).
    pub internal_stall: bool,
    /// Decode finished reading operands and resolving any branch; guards
    /// against re-resolution while the slot waits for EX to free up.
    pub resolved: bool,
    /// Program counter of the instruction.
    pub pc: u16,
    /// Decoded instruction.
    pub inst: Instruction,
    /// First operand, read in ID.
    pub rs_value: u32,
    /// Second operand, read in ID.
    pub rt_value: u32,
    /// Sign-extended immediate presented on the R1 port.
    pub imm_val: u32,
    /// ALU output or effective word address.
    pub alu_result: u32,
    /// Loaded word, or the store data for `SW`.
    pub mem_data: u32,
    /// The instruction commits a register write in WB.
    pub reg_write: bool,
    /// The instruction is `HALT` draining toward WB.
    pub is_halt: bool,
    /// Destination register written in WB.
    pub rw: u8,
}

/// Moves an instruction out of an upstream slot, clearing it.
pub(crate) fn take(upstream: &mut PipeSlot) -> PipeSlot {
    let slot = *upstream;
    upstream.valid = false;
    slot
}

/// The five latch slots of one core.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pipeline {
    /// Instruction fetch slot.
    pub fetch: PipeSlot,
    /// Decode slot.
    pub decode: PipeSlot,
    /// Execute slot.
    pub execute: PipeSlot,
    /// Memory access slot.
    pub mem: PipeSlot,
    /// Writeback slot.
    pub writeback: PipeSlot,
}

impl Pipeline {
    /// True when no slot holds an instruction; with all cores halted this is
    /// the termination condition.
    pub fn is_empty(&self) -> bool {
        !(self.fetch.valid
            || self.decode.valid
            || self.execute.valid
            || self.mem.valid
            || self.writeback.valid)
    }
}
