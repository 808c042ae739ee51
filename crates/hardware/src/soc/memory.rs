//! Flat main memory.
//!
//! A zero-initialized array of 2^21 words. Reads outside the address space
//! return zero and writes outside it are discarded; the simulated machine
//! has no bus faults. Memory itself has no timing: the bus FSM models the
//! fill latency and is the only mutator.

use crate::common::constants::{BLOCK_WORDS, MAIN_MEM_WORDS};

/// The shared backing store.
#[derive(Clone, Debug)]
pub struct MainMemory {
    data: Vec<u32>,
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMemory {
    /// Allocates a zeroed memory.
    pub fn new() -> Self {
        Self {
            data: vec![0; MAIN_MEM_WORDS],
        }
    }

    /// Reads one word; out-of-range addresses read zero.
    pub fn read_word(&self, addr: u32) -> u32 {
        self.data.get(addr as usize).copied().unwrap_or(0)
    }

    /// Writes one word; out-of-range addresses are discarded.
    pub fn write_word(&mut self, addr: u32, data: u32) {
        if let Some(cell) = self.data.get_mut(addr as usize) {
            *cell = data;
        }
    }

    /// Copies the 8-word block starting at `base` (block-aligned).
    pub fn read_block(&self, base: u32) -> [u32; BLOCK_WORDS] {
        let mut block = [0u32; BLOCK_WORDS];
        for (i, word) in block.iter_mut().enumerate() {
            *word = self.read_word(base + i as u32);
        }
        block
    }

    /// The full word array, for the memory dump writer.
    pub fn words(&self) -> &[u32] {
        &self.data
    }
}
