//! Machine Geometry and Timing Constants.
//!
//! Every dimension of the simulated machine lives here: core count, register
//! file size, memory sizes, cache geometry, bus timing, and the simulation
//! safety ceiling. The cache address split over a 21-bit word address is
//! `offset = addr[2:0]`, `index = addr[8:3]`, `tag = addr[20:9]`.

/// Number of cores sharing the bus.
pub const NUM_CORES: usize = 4;

/// Architectural registers per core (R0 and R1 are reserved).
pub const NUM_REGISTERS: usize = 16;

/// Instruction memory capacity per core, in 32-bit words.
pub const IMEM_WORDS: usize = 1024;

/// Main memory capacity in 32-bit words (word-addressed, 21-bit address).
pub const MAIN_MEM_WORDS: usize = 1 << 21;

/// Data cache capacity per core, in 32-bit words.
pub const CACHE_WORDS: usize = 512;

/// Words per cache block (and per bus Flush transfer).
pub const BLOCK_WORDS: usize = 8;

/// Number of direct-mapped cache sets.
pub const CACHE_SETS: usize = CACHE_WORDS / BLOCK_WORDS;

/// Cycles from a memory-sourced Request to its first Flush word.
pub const MEM_LATENCY: u32 = 16;

/// Latency countdown loaded when main memory sources a fill (the Request
/// cycle itself accounts for the remaining cycle of [`MEM_LATENCY`]).
pub const LATENCY_TIMER: u32 = MEM_LATENCY - 1;

/// Mask reducing a program counter to the 10-bit instruction address space.
pub const PC_MASK: u32 = 0x3FF;

/// Mask reducing a data address to the 21-bit word address space.
pub const WORD_ADDR_MASK: u32 = 0x1F_FFFF;

/// Mask for the in-block word offset, bits `[2:0]` of a word address.
pub const OFFSET_MASK: u32 = 0x7;

/// Mask for the set index, bits `[8:3]` of a word address (after shifting).
pub const INDEX_MASK: u32 = 0x3F;

/// Mask for the cache tag, bits `[20:9]` of a word address (after shifting).
pub const TAG_MASK: u32 = 0xFFF;

/// Originator id used on the bus for main memory (cores are 0..=3).
pub const MEM_ORIGID: u8 = 4;

/// Global cycle ceiling: a run that has not drained by then is aborted.
pub const DEFAULT_MAX_CYCLES: u64 = 100_000;
