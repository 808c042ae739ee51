//! Memory Access (MEM) Stage.
//!
//! Loads and stores probe the private cache the moment they arrive from EX;
//! the probe fixes the hit/miss statistics exactly once per instruction and
//! decides whether the stage stalls. While stalled the access retries every
//! cycle: the cache keeps the bus request pending until the fill lands, and
//! the retry that follows the fill completes the access. Non-memory
//! instructions pass straight through.

use crate::common::constants::WORD_ADDR_MASK;
use crate::core::Core;
use crate::core::pipeline::take;
use crate::soc::bus::BusArbiter;

/// Executes the memory stage for one cycle.
pub fn mem_stage(core: &mut Core, bus: &mut BusArbiter) {
    let pulled = if !core.pipeline.mem.valid
        && core.pipeline.execute.valid
        && !core.pipeline.execute.internal_stall
    {
        core.pipeline.mem = take(&mut core.pipeline.execute);
        true
    } else {
        false
    };

    if !core.pipeline.mem.valid {
        return;
    }
    let inst = core.pipeline.mem.inst;
    if !(inst.is_load() || inst.is_store()) {
        core.pipeline.mem.internal_stall = false;
        return;
    }

    let addr = core.pipeline.mem.alu_result & WORD_ADDR_MASK;

    if pulled {
        // Eager probe on arrival: statistics count the first attempt only.
        let hit = if inst.is_load() {
            core.cache.probe_read(addr)
        } else {
            core.cache.probe_write(addr)
        };
        match (inst.is_load(), hit) {
            (true, true) => core.stats.read_hit += 1,
            (true, false) => core.stats.read_miss += 1,
            (false, true) => core.stats.write_hit += 1,
            (false, false) => core.stats.write_miss += 1,
        }
        core.pipeline.mem.internal_stall = !hit;
    }

    if inst.is_load() {
        match core.cache.read(addr, core.id, bus) {
            Some(word) => {
                core.pipeline.mem.mem_data = word;
                core.pipeline.mem.internal_stall = false;
            }
            None => {
                core.pipeline.mem.internal_stall = true;
                core.stats.mem_stall += 1;
            }
        }
    } else {
        let data = core.pipeline.mem.mem_data;
        if core.cache.write(addr, data, core.id, bus) {
            core.pipeline.mem.internal_stall = false;
        } else {
            core.pipeline.mem.internal_stall = true;
            core.stats.mem_stall += 1;
        }
    }
}
