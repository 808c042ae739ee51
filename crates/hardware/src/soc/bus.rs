//! Shared bus arbiter and transaction FSM.
//!
//! All four caches and main memory hang off one bus. This module implements:
//! 1. **Arbitration:** A per-core pending slot and a round-robin scan
//!    starting one past the last grant.
//! 2. **Transaction FSM:** Idle → Arbitrate → Request → Latency → Flush.
//!    Arbitrate falls through to Request within the same cycle; Latency only
//!    exists for memory-sourced fills.
//! 3. **Snoop Orchestration:** During the Request cycle every other cache is
//!    snooped exactly once; the `shared` line and the data provider are
//!    latched there and never re-evaluated.
//! 4. **Data Phases:** Memory fills after a 16-cycle first-word latency,
//!    cache-to-cache transfers that update memory in parallel, and dirty
//!    victim write-backs.
//!
//! A grant is final: the whole Request → Latency → Flush sequence belongs to
//! one owner and cannot be preempted.

use std::fmt::Write as _;

use crate::common::constants::{BLOCK_WORDS, LATENCY_TIMER, MEM_ORIGID, NUM_CORES};
use crate::core::Core;
use crate::core::cache::{MesiState, block_base};
use crate::soc::memory::MainMemory;

/// Command driven onto the bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BusCmd {
    /// Nothing on the wire.
    #[default]
    None,
    /// Read a block; other holders may keep it Shared.
    BusRd,
    /// Read for ownership; every other holder invalidates.
    BusRdX,
    /// One word of a data phase.
    Flush,
}

impl BusCmd {
    /// Integer encoding used in the bus trace.
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::BusRd => 1,
            Self::BusRdX => 2,
            Self::Flush => 3,
        }
    }
}

/// Signals on the bus during one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusTransaction {
    /// Originator: 0..=3 for cores, 4 for main memory.
    pub origid: u8,
    /// Command on the wire.
    pub cmd: BusCmd,
    /// 21-bit word address.
    pub addr: u32,
    /// Data word (Flush phases only).
    pub data: u32,
    /// Sideband: some other cache holds the block valid.
    pub shared: bool,
}

/// Transaction FSM state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BusState {
    /// No transaction; arbitration is attempted each cycle.
    #[default]
    Idle,
    /// A grant was made this cycle; falls through to Request immediately.
    Arbitrate,
    /// The owner's command is published and all other caches snoop.
    Request,
    /// Waiting out the main-memory first-word latency.
    Latency,
    /// One word per cycle of the 8-word data phase.
    Flush,
}

/// A request parked in a core's pending slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// `BusRd`, `BusRdX`, or `Flush` (dirty victim write-back).
    pub cmd: BusCmd,
    /// Word address: the demand address, or the victim block base.
    pub addr: u32,
}

/// The shared-bus arbiter.
#[derive(Clone, Debug)]
pub struct BusArbiter {
    /// FSM state for the current cycle.
    pub state: BusState,
    /// Signals on the wire this cycle (`cmd == None` when quiet).
    pub current: BusTransaction,
    pending: [Option<PendingRequest>; NUM_CORES],
    last_granted: usize,
    owner: Option<usize>,
    origin_cmd: BusCmd,
    req_addr: u32,
    timer: u32,
    provider_id: u8,
    shared_at_request: bool,
    fill_buffer: [u32; BLOCK_WORDS],
    trace: Vec<String>,
}

impl Default for BusArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl BusArbiter {
    /// Creates an idle bus. `last_granted` starts at the highest core id so
    /// core 0 is the first round-robin candidate.
    pub fn new() -> Self {
        Self {
            state: BusState::Idle,
            current: BusTransaction::default(),
            pending: [None; NUM_CORES],
            last_granted: NUM_CORES - 1,
            owner: None,
            origin_cmd: BusCmd::None,
            req_addr: 0,
            timer: 0,
            provider_id: MEM_ORIGID,
            shared_at_request: false,
            fill_buffer: [0; BLOCK_WORDS],
            trace: Vec::new(),
        }
    }

    /// Parks a request in the core's pending slot; ignored while a request
    /// from the same core is already parked.
    pub fn request(&mut self, core_id: usize, cmd: BusCmd, addr: u32) {
        let slot = &mut self.pending[core_id];
        if slot.is_none() {
            *slot = Some(PendingRequest { cmd, addr });
        }
    }

    /// True while the core has a request parked or a transaction in flight.
    pub fn has_request(&self, core_id: usize) -> bool {
        self.pending[core_id].is_some() || self.owner == Some(core_id)
    }

    /// The request parked in a core's pending slot, if any.
    pub fn pending_request(&self, core_id: usize) -> Option<PendingRequest> {
        self.pending[core_id]
    }

    /// The core whose transaction currently owns the bus.
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    /// The `shared` line value latched during the Request cycle.
    pub fn shared_at_request(&self) -> bool {
        self.shared_at_request
    }

    /// Accumulated bus trace lines.
    pub fn trace_lines(&self) -> &[String] {
        &self.trace
    }

    /// Round-robin grant: scan one past the last grant, wrapping, and take
    /// the first parked request.
    fn arbitrate(&mut self) -> Option<usize> {
        for step in 1..=NUM_CORES {
            let candidate = (self.last_granted + step) % NUM_CORES;
            if let Some(req) = self.pending[candidate].take() {
                self.last_granted = candidate;
                self.owner = Some(candidate);
                self.origin_cmd = req.cmd;
                self.req_addr = req.addr;
                return Some(candidate);
            }
        }
        None
    }

    fn push_trace(&mut self, cycle: u64) {
        let t = &self.current;
        let mut line = String::new();
        let _ = write!(
            line,
            "{} {} {} {:06X} {:08X} {}",
            cycle,
            t.origid,
            t.cmd.code(),
            t.addr,
            t.data,
            u8::from(t.shared)
        );
        self.trace.push(line);
    }

    fn finish(&mut self) {
        self.state = BusState::Idle;
        self.owner = None;
        self.origin_cmd = BusCmd::None;
    }
}

/// Advances the bus by one cycle: arbitration, snooping, latency countdown,
/// and data transfer, in whichever the FSM calls for.
pub fn bus_cycle(
    bus: &mut BusArbiter,
    cores: &mut [Core; NUM_CORES],
    memory: &mut MainMemory,
    cycle: u64,
) {
    bus.current = BusTransaction::default();

    if bus.state == BusState::Idle && bus.arbitrate().is_some() {
        bus.state = BusState::Arbitrate;
    }
    if bus.state == BusState::Arbitrate {
        // Arbitration falls through: the Request phase runs this same cycle.
        bus.state = BusState::Request;
        request_phase(bus, cores, memory, cycle);
        return;
    }

    match bus.state {
        BusState::Latency => {
            bus.timer -= 1;
            if bus.timer == 0 {
                bus.state = BusState::Flush;
                bus.timer = BLOCK_WORDS as u32;
            }
        }
        BusState::Flush => flush_phase(bus, cores, memory, cycle),
        _ => {}
    }
}

/// Publishes the granted command, snoops every other cache, latches the
/// `shared` line and the provider, and stages the fill data.
fn request_phase(
    bus: &mut BusArbiter,
    cores: &mut [Core; NUM_CORES],
    memory: &MainMemory,
    cycle: u64,
) {
    let Some(owner) = bus.owner else { return };

    if bus.origin_cmd == BusCmd::Flush {
        // Dirty victim write-back. The block may have been snooped away
        // between enqueue and grant; the transaction is then moot.
        let cache = &cores[owner].cache;
        if cache.state_of(bus.req_addr) != MesiState::Modified {
            bus.finish();
            return;
        }
        bus.provider_id = owner as u8;
        bus.shared_at_request = false;
        bus.fill_buffer = cache.copy_block(bus.req_addr);
        bus.current = BusTransaction {
            origid: owner as u8,
            cmd: BusCmd::Flush,
            addr: bus.req_addr,
            data: 0,
            shared: false,
        };
        bus.push_trace(cycle);
        bus.state = BusState::Flush;
        bus.timer = BLOCK_WORDS as u32;
        return;
    }

    let mut trans = BusTransaction {
        origid: owner as u8,
        cmd: bus.origin_cmd,
        addr: bus.req_addr,
        data: 0,
        shared: false,
    };

    let mut provided = None;
    for (id, core) in cores.iter_mut().enumerate() {
        if id == owner {
            continue;
        }
        if let Some(block) = core.cache.snoop(&mut trans) {
            provided = Some(block);
            bus.provider_id = id as u8;
        }
    }

    bus.shared_at_request = trans.shared;
    bus.current = trans;
    bus.push_trace(cycle);

    if let Some(block) = provided {
        // Cache-to-cache transfer: skip the memory latency entirely.
        bus.fill_buffer = block;
        bus.state = BusState::Flush;
        bus.timer = BLOCK_WORDS as u32;
    } else {
        bus.provider_id = MEM_ORIGID;
        bus.fill_buffer = memory.read_block(block_base(bus.req_addr));
        bus.state = BusState::Latency;
        bus.timer = LATENCY_TIMER;
    }
}

/// Emits one word of the data phase: trace, memory write-through when the
/// provider is a cache, and delivery to the owner's fill port.
fn flush_phase(
    bus: &mut BusArbiter,
    cores: &mut [Core; NUM_CORES],
    memory: &mut MainMemory,
    cycle: u64,
) {
    let Some(owner) = bus.owner else { return };

    let word_idx = BLOCK_WORDS - bus.timer as usize;
    let base = block_base(bus.req_addr);
    let word_addr = base + word_idx as u32;
    let data = bus.fill_buffer[word_idx];

    bus.current = BusTransaction {
        origid: bus.provider_id,
        cmd: BusCmd::Flush,
        addr: word_addr,
        data,
        shared: bus.shared_at_request,
    };
    bus.push_trace(cycle);

    if bus.origin_cmd == BusCmd::Flush {
        // Victim write-back: words land in memory only.
        memory.write_word(word_addr, data);
    } else {
        if bus.provider_id != MEM_ORIGID {
            memory.write_word(word_addr, data);
        }
        let trans = bus.current;
        for (id, core) in cores.iter_mut().enumerate() {
            core.handle_bus_word(&trans, id == owner, bus.origin_cmd, bus.shared_at_request);
        }
    }

    bus.timer -= 1;
    if bus.timer == 0 {
        if bus.origin_cmd == BusCmd::Flush {
            cores[owner].cache.invalidate_block(base);
        }
        bus.finish();
    }
}
