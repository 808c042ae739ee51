//! Shared interconnect and backing store.
//!
//! The four cores meet here: a single arbitrated bus carries every miss,
//! upgrade, and write-back, and a flat word-addressed main memory backs all
//! fills. This module provides:
//! 1. **Bus:** Round-robin arbitration, the transaction FSM, snoop
//!    orchestration, and the bus trace.
//! 2. **Memory:** The 2^21-word backing store.

/// Shared bus arbiter and transaction FSM.
pub mod bus;
/// Flat main memory.
pub mod memory;

pub use bus::{BusArbiter, BusCmd, BusState, BusTransaction};
pub use memory::MainMemory;
