//! Simulation driver.
//!
//! The [`Simulator`] aggregate owns the whole machine — four cores, the bus,
//! and main memory — and advances it one global clock tick at a time. Each
//! tick runs the bus FSM first, then every core in id order; main memory has
//! no state of its own to advance (the bus stages fill data when a
//! transaction starts). The run ends when every core has halted with an empty
//! pipeline, or when the safety ceiling aborts a pathological program.

/// Hex image loaders for instruction and data memory.
pub mod loader;
/// Writers for every output dump.
pub mod output;

use tracing::{debug, warn};

use crate::common::constants::NUM_CORES;
use crate::config::SimConfig;
use crate::core::{Core, core_cycle};
use crate::soc::bus::{BusArbiter, bus_cycle};
use crate::soc::memory::MainMemory;

/// The whole simulated machine.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The four cores, advanced in id order each tick.
    pub cores: [Core; NUM_CORES],
    /// Shared main memory.
    pub memory: MainMemory,
    /// Shared bus arbiter.
    pub bus: BusArbiter,
    /// Global cycle counter; the first tick executes as cycle 0.
    pub cycle: u64,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Creates a machine with zeroed memories and idle cores.
    pub fn new() -> Self {
        Self {
            cores: std::array::from_fn(Core::new),
            memory: MainMemory::new(),
            bus: BusArbiter::new(),
            cycle: 0,
        }
    }

    /// Advances the machine by one global clock tick: bus, then memory
    /// (a no-op), then each core, then the cycle counter.
    pub fn tick(&mut self) {
        let Self {
            cores,
            memory,
            bus,
            cycle,
        } = self;
        bus_cycle(bus, cores, memory, *cycle);
        for core in cores.iter_mut() {
            core_cycle(core, bus, *cycle);
        }
        *cycle += 1;
    }

    /// True when every core has halted and drained its pipeline.
    pub fn done(&self) -> bool {
        self.cores
            .iter()
            .all(|core| core.halted && core.pipeline.is_empty())
    }

    /// Runs to completion, bounded by the configured safety ceiling. Returns
    /// `false` when the ceiling was hit; the machine state is still dumped
    /// normally.
    pub fn run(&mut self, config: &SimConfig) -> bool {
        while !self.done() {
            if self.cycle >= config.max_cycles {
                warn!(cycle = self.cycle, "safety ceiling hit, aborting run");
                return false;
            }
            self.tick();
        }
        debug!(cycle = self.cycle, "all cores halted, pipelines drained");
        true
    }
}
