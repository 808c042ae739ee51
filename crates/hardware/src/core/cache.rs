//! Private write-back data cache with MESI coherence.
//!
//! Each core owns one direct-mapped cache: 512 data words in 8-word blocks
//! over 64 sets, with a tag/state entry per set. This module implements:
//! 1. **Pipeline Port:** Probes, reads, and writes issued by the MEM stage,
//!    issuing bus requests on misses.
//! 2. **Snoop Port:** One-shot state transitions driven by foreign bus
//!    transactions during their Request cycle, optionally providing a block
//!    for cache-to-cache transfer.
//! 3. **Fill Port:** Word-by-word acceptance of a bus Flush, with the MESI
//!    final state decided on the last word.
//!
//! A store to a Shared block is treated as a miss: ownership must first be
//! acquired with a `BusRdX` upgrade. A miss whose set holds a Modified block
//! under a different tag first writes that victim back over the bus.

use crate::common::constants::{BLOCK_WORDS, CACHE_SETS, CACHE_WORDS, INDEX_MASK, OFFSET_MASK, TAG_MASK};
use crate::soc::bus::{BusArbiter, BusCmd, BusTransaction};

/// MESI coherence state of one cache block.
///
/// The discriminants are the packed TSRAM dump encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum MesiState {
    /// Block not present.
    #[default]
    Invalid = 0,
    /// Present, clean, possibly held by other caches.
    Shared = 1,
    /// Present, clean, held by this cache alone.
    Exclusive = 2,
    /// Present, dirty, held by this cache alone; memory is stale.
    Modified = 3,
}

/// Tag/state entry of one cache set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TsramEntry {
    /// Address bits `[20:9]` of the cached block.
    pub tag: u16,
    /// Coherence state; `Invalid` means the set is empty.
    pub state: MesiState,
}

impl TsramEntry {
    /// True when the set holds a block.
    pub fn valid(&self) -> bool {
        self.state != MesiState::Invalid
    }
}

/// In-block word offset of a word address, bits `[2:0]`.
pub fn offset_of(addr: u32) -> usize {
    (addr & OFFSET_MASK) as usize
}

/// Set index of a word address, bits `[8:3]`.
pub fn index_of(addr: u32) -> usize {
    ((addr >> 3) & INDEX_MASK) as usize
}

/// Cache tag of a word address, bits `[20:9]`.
pub fn tag_of(addr: u32) -> u16 {
    ((addr >> 9) & TAG_MASK) as u16
}

/// Address of the first word of the block containing `addr`.
pub fn block_base(addr: u32) -> u32 {
    addr & !OFFSET_MASK
}

/// Reassembles a block-base word address from a tag and a set index.
pub fn block_addr(tag: u16, index: usize) -> u32 {
    u32::from(tag) << 9 | (index as u32) << 3
}

/// One core's private data cache.
#[derive(Clone, Debug)]
pub struct DataCache {
    dsram: [u32; CACHE_WORDS],
    tsram: [TsramEntry; CACHE_SETS],
    /// Store data parked while a `BusRdX` fill is in flight; applied onto the
    /// freshly filled block so the upgrading store cannot be lost.
    pending_store: Option<(u32, u32)>,
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCache {
    /// Creates an empty cache: all sets Invalid, all data zero.
    pub fn new() -> Self {
        Self {
            dsram: [0; CACHE_WORDS],
            tsram: [TsramEntry::default(); CACHE_SETS],
            pending_store: None,
        }
    }

    /// Hit probe without side effects; returns the cached word on a hit.
    pub fn peek(&self, addr: u32) -> Option<u32> {
        let index = index_of(addr);
        let entry = self.tsram[index];
        (entry.valid() && entry.tag == tag_of(addr))
            .then(|| self.dsram[index * BLOCK_WORDS + offset_of(addr)])
    }

    /// True when a load to `addr` would hit.
    pub fn probe_read(&self, addr: u32) -> bool {
        self.peek(addr).is_some()
    }

    /// True when a store to `addr` would hit. Stores require ownership, so a
    /// Shared block does not count.
    pub fn probe_write(&self, addr: u32) -> bool {
        let entry = self.tsram[index_of(addr)];
        entry.tag == tag_of(addr)
            && matches!(entry.state, MesiState::Exclusive | MesiState::Modified)
    }

    /// Load port. Returns the word on a hit; on a miss enqueues a `BusRd`
    /// (unless this core already has a transaction pending or owned) and
    /// returns `None`.
    pub fn read(&mut self, addr: u32, core_id: usize, bus: &mut BusArbiter) -> Option<u32> {
        if let Some(word) = self.peek(addr) {
            return Some(word);
        }
        self.request_on_miss(addr, BusCmd::BusRd, core_id, bus);
        None
    }

    /// Store port. On a hit writes the word and moves the block to Modified.
    /// On a miss (including a Shared upgrade) parks the store data, enqueues
    /// a `BusRdX`, and returns `false`.
    pub fn write(&mut self, addr: u32, data: u32, core_id: usize, bus: &mut BusArbiter) -> bool {
        if self.probe_write(addr) {
            let index = index_of(addr);
            self.dsram[index * BLOCK_WORDS + offset_of(addr)] = data;
            self.tsram[index].state = MesiState::Modified;
            return true;
        }
        self.pending_store = Some((addr, data));
        self.request_on_miss(addr, BusCmd::BusRdX, core_id, bus);
        false
    }

    /// Issues the bus request for a miss. A Modified victim under a different
    /// tag must leave first: its write-back is requested instead, and a later
    /// retry issues the demand request once the set is free.
    fn request_on_miss(&self, addr: u32, cmd: BusCmd, core_id: usize, bus: &mut BusArbiter) {
        if bus.has_request(core_id) {
            return;
        }
        let index = index_of(addr);
        let entry = self.tsram[index];
        if entry.state == MesiState::Modified && entry.tag != tag_of(addr) {
            bus.request(core_id, BusCmd::Flush, block_addr(entry.tag, index));
        } else {
            bus.request(core_id, cmd, addr);
        }
    }

    /// Snoops a foreign transaction during its Request cycle. Returns the
    /// block when this cache must provide the data (it held the block
    /// Modified); the caller stages it for the Flush phase.
    pub fn snoop(&mut self, trans: &mut BusTransaction) -> Option<[u32; BLOCK_WORDS]> {
        let index = index_of(trans.addr);
        let entry = self.tsram[index];
        if !entry.valid() || entry.tag != tag_of(trans.addr) {
            return None;
        }
        match trans.cmd {
            BusCmd::BusRd => {
                trans.shared = true;
                if entry.state == MesiState::Modified {
                    let block = self.copy_block_at(index);
                    self.tsram[index].state = MesiState::Shared;
                    Some(block)
                } else {
                    self.tsram[index].state = MesiState::Shared;
                    None
                }
            }
            BusCmd::BusRdX => {
                let provided =
                    (entry.state == MesiState::Modified).then(|| self.copy_block_at(index));
                self.tsram[index].state = MesiState::Invalid;
                provided
            }
            _ => None,
        }
    }

    /// Accepts one word of a bus Flush directed at this cache. On the final
    /// word the tag and MESI state are installed: Modified for a `BusRdX`
    /// fill, otherwise Shared when another cache held the block at request
    /// time and Exclusive when none did. A parked upgrade store is applied
    /// onto the completed block.
    pub fn fill_word(&mut self, addr: u32, data: u32, origin: BusCmd, shared_at_request: bool) {
        let index = index_of(addr);
        let offset = offset_of(addr);
        self.dsram[index * BLOCK_WORDS + offset] = data;
        if offset != BLOCK_WORDS - 1 {
            return;
        }
        let state = if origin == BusCmd::BusRdX {
            MesiState::Modified
        } else if shared_at_request {
            MesiState::Shared
        } else {
            MesiState::Exclusive
        };
        self.tsram[index] = TsramEntry {
            tag: tag_of(addr),
            state,
        };
        if origin == BusCmd::BusRdX {
            if let Some((store_addr, store_data)) = self.pending_store.take() {
                if index_of(store_addr) == index && tag_of(store_addr) == tag_of(addr) {
                    self.dsram[index * BLOCK_WORDS + offset_of(store_addr)] = store_data;
                }
            }
        }
    }

    /// Copies the block containing `addr` out of the data array.
    pub fn copy_block(&self, addr: u32) -> [u32; BLOCK_WORDS] {
        self.copy_block_at(index_of(addr))
    }

    fn copy_block_at(&self, index: usize) -> [u32; BLOCK_WORDS] {
        let mut block = [0u32; BLOCK_WORDS];
        block.copy_from_slice(&self.dsram[index * BLOCK_WORDS..(index + 1) * BLOCK_WORDS]);
        block
    }

    /// Drops the block containing `addr`, if present. Used when its
    /// write-back transaction completes.
    pub fn invalidate_block(&mut self, addr: u32) {
        let index = index_of(addr);
        if self.tsram[index].tag == tag_of(addr) {
            self.tsram[index].state = MesiState::Invalid;
        }
    }

    /// Tag/state entry of one set, for dumps and assertions.
    pub fn tsram_entry(&self, index: usize) -> TsramEntry {
        self.tsram[index & (CACHE_SETS - 1)]
    }

    /// MESI state of the block containing `addr`, `Invalid` on a tag
    /// mismatch.
    pub fn state_of(&self, addr: u32) -> MesiState {
        let entry = self.tsram[index_of(addr)];
        if entry.tag == tag_of(addr) {
            entry.state
        } else {
            MesiState::Invalid
        }
    }

    /// One raw data-array word, for dumps.
    pub fn dsram_word(&self, idx: usize) -> u32 {
        self.dsram[idx & (CACHE_WORDS - 1)]
    }
}
