//! Cycle-accurate quad-core chip-multiprocessor simulator library.
//!
//! This crate models a four-core machine at one-cycle granularity:
//! 1. **Cores:** 5-stage in-order pipelines (IF, ID, EX, MEM, WB) with
//!    hazard stalls, decode-time branch resolution, and one delay slot.
//! 2. **Caches:** A private direct-mapped write-back data cache per core,
//!    kept coherent with the MESI protocol.
//! 3. **Bus:** A shared, round-robin arbitrated bus sequencing
//!    Arbitrate → Request → Latency → Flush, with cache-to-cache transfers.
//! 4. **Memory:** A flat 2^21-word backing store.
//! 5. **Simulation:** The [`Simulator`] driver, hex image loaders, and the
//!    trace/dump writers.

/// Common constants and error types.
pub mod common;
/// File-set and run configuration.
pub mod config;
/// Processor core: pipeline, registers, cache.
pub mod core;
/// Instruction set: opcodes, encode/decode, classification.
pub mod isa;
/// Simulation driver, loaders, and output writers.
pub mod sim;
/// Shared bus and main memory.
pub mod soc;
/// Per-core statistics.
pub mod stats;

/// The input/output file set of a run.
pub use crate::config::{FileSet, SimConfig};
/// One processor core.
pub use crate::core::Core;
/// The whole machine; construct with `Simulator::new()`.
pub use crate::sim::Simulator;
