//! Decode (ID) Stage — hazard detection and branch resolution.
//!
//! Decode owns the two behaviors that shape the whole pipeline:
//! 1. **Data hazards.** An instruction whose source register is the pending
//!    destination of anything in EX, MEM, or WB stalls in place (there is no
//!    forwarding network). Branches, `JAL`, and `SW` additionally treat `rd`
//!    as a source: the jump target or the store data.
//! 2. **Branches.** All control flow resolves here, with signed comparisons.
//!    A taken branch latches `branch_pending`; the PC changes only at the end
//!    of the cycle, so the instruction already sitting in IF survives as the
//!    architectural delay slot.
//!
//! Operands are read and branches resolved exactly once per instruction, on
//! its first un-stalled cycle; the slot then waits for EX to pull it.

use crate::common::constants::PC_MASK;
use crate::core::Core;
use crate::core::pipeline::take;
use crate::isa::Opcode;

/// Executes the decode stage for one cycle.
pub fn decode_stage(core: &mut Core) {
    if !core.pipeline.decode.valid && core.pipeline.fetch.valid {
        let mut slot = take(&mut core.pipeline.fetch);
        slot.imm_val = slot.inst.imm_value();
        slot.resolved = false;
        slot.internal_stall = false;
        core.pipeline.decode = slot;
    }

    if !core.pipeline.decode.valid || core.pipeline.decode.resolved {
        return;
    }

    let inst = core.pipeline.decode.inst;
    let hazard = hazard_on(core, inst.rs)
        || hazard_on(core, inst.rt)
        || (inst.opcode.reads_rd() && hazard_on(core, inst.rd));
    if hazard {
        core.pipeline.decode.internal_stall = true;
        core.stats.decode_stall += 1;
        return;
    }
    core.pipeline.decode.internal_stall = false;

    let imm_val = core.pipeline.decode.imm_val;
    let rs_value = core.regs.read(inst.rs, imm_val);
    let rt_value = core.regs.read(inst.rt, imm_val);
    core.pipeline.decode.rs_value = rs_value;
    core.pipeline.decode.rt_value = rt_value;
    core.pipeline.decode.reg_write = inst.writes_register();
    core.pipeline.decode.rw = inst.dest_register();
    core.pipeline.decode.resolved = true;

    match inst.opcode {
        op if op.is_cond_branch() => {
            if branch_taken(op, rs_value, rt_value) {
                core.branch_target = (core.regs.read(inst.rd, imm_val) & PC_MASK) as u16;
                core.branch_pending = true;
            }
        }
        Opcode::Jal => {
            core.pipeline.decode.alu_result = (u32::from(core.pipeline.decode.pc) + 2) & PC_MASK;
            core.branch_target = (core.regs.read(inst.rd, imm_val) & PC_MASK) as u16;
            core.branch_pending = true;
        }
        Opcode::Halt => {
            // Kill the delay-slot fetch and stop fetching; HALT itself drains
            // down the pipeline to commit in WB.
            core.pipeline.decode.is_halt = true;
            core.pipeline.fetch.valid = false;
            core.halt_fetch = true;
        }
        _ => {}
    }
}

/// True when register `r` is the pending destination of an in-flight
/// instruction in EX, MEM, or WB. R0 and R1 never hazard.
fn hazard_on(core: &Core, r: u8) -> bool {
    if r < 2 {
        return false;
    }
    [
        &core.pipeline.execute,
        &core.pipeline.mem,
        &core.pipeline.writeback,
    ]
    .into_iter()
    .any(|slot| slot.valid && slot.reg_write && slot.rw == r)
}

/// Signed branch comparison.
fn branch_taken(op: Opcode, rs: u32, rt: u32) -> bool {
    let (a, b) = (rs as i32, rt as i32);
    match op {
        Opcode::Beq => a == b,
        Opcode::Bne => a != b,
        Opcode::Blt => a < b,
        Opcode::Bgt => a > b,
        Opcode::Ble => a <= b,
        Opcode::Bge => a >= b,
        _ => false,
    }
}
