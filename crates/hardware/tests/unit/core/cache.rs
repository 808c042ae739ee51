//! Data cache unit tests.
//!
//! Drives one `DataCache` directly through its three ports — the pipeline
//! port (probe/read/write), the snoop port, and the fill port — with a bare
//! bus arbiter to catch the requests misses enqueue.

use quadsim_core::core::cache::{DataCache, MesiState, block_base, index_of};
use quadsim_core::soc::bus::{BusArbiter, BusCmd, BusTransaction};

/// Fills the whole block containing `addr` word by word, as the bus would.
fn fill_block(cache: &mut DataCache, addr: u32, words: &[u32; 8], origin: BusCmd, shared: bool) {
    let base = block_base(addr);
    for (i, &word) in words.iter().enumerate() {
        cache.fill_word(base + i as u32, word, origin, shared);
    }
}

fn words(seed: u32) -> [u32; 8] {
    std::array::from_fn(|i| seed + i as u32)
}

#[test]
fn cold_read_misses_and_requests_busrd() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();

    assert_eq!(cache.read(0x40, 0, &mut bus), None);
    let req = bus.pending_request(0).expect("miss should park a request");
    assert_eq!(req.cmd, BusCmd::BusRd);
    assert_eq!(req.addr, 0x40);

    // Retrying while the request is parked does not enqueue another.
    assert_eq!(cache.read(0x40, 0, &mut bus), None);
    assert_eq!(bus.pending_request(0).map(|r| r.addr), Some(0x40));
}

#[test]
fn busrd_fill_without_sharers_installs_exclusive() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(100), BusCmd::BusRd, false);

    assert_eq!(cache.state_of(0x40), MesiState::Exclusive);
    assert_eq!(cache.peek(0x40), Some(100));
    assert_eq!(cache.peek(0x47), Some(107));
}

#[test]
fn busrd_fill_with_sharers_installs_shared() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(100), BusCmd::BusRd, true);
    assert_eq!(cache.state_of(0x40), MesiState::Shared);
}

#[test]
fn write_hit_on_exclusive_moves_to_modified() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();
    fill_block(&mut cache, 0x40, &words(100), BusCmd::BusRd, false);

    assert!(cache.write(0x42, 0xAB, 0, &mut bus));
    assert_eq!(cache.state_of(0x42), MesiState::Modified);
    assert_eq!(cache.peek(0x42), Some(0xAB));
    assert!(bus.pending_request(0).is_none());
}

#[test]
fn write_to_shared_is_an_upgrade_miss() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();
    fill_block(&mut cache, 0x40, &words(100), BusCmd::BusRd, true);

    // Tag and data match, but Shared does not confer ownership.
    assert!(cache.probe_read(0x40));
    assert!(!cache.probe_write(0x40));
    assert!(!cache.write(0x40, 0xAB, 0, &mut bus));

    let req = bus.pending_request(0).expect("upgrade should park a request");
    assert_eq!(req.cmd, BusCmd::BusRdX);
    assert_eq!(cache.peek(0x40), Some(100), "data untouched until ownership");
}

#[test]
fn busrdx_fill_installs_modified_and_applies_parked_store() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();

    assert!(!cache.write(0x43, 0xBEEF, 0, &mut bus));
    assert_eq!(bus.pending_request(0).map(|r| r.cmd), Some(BusCmd::BusRdX));

    fill_block(&mut cache, 0x43, &words(200), BusCmd::BusRdX, false);
    assert_eq!(cache.state_of(0x43), MesiState::Modified);
    assert_eq!(cache.peek(0x43), Some(0xBEEF), "parked store lands on the fill");
    assert_eq!(cache.peek(0x40), Some(200), "other words keep the fill data");
}

#[test]
fn snoop_busrd_on_modified_provides_and_degrades_to_shared() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();
    assert!(!cache.write(0x40, 1, 0, &mut bus));
    fill_block(&mut cache, 0x40, &words(300), BusCmd::BusRdX, false);

    let mut trans = BusTransaction {
        origid: 1,
        cmd: BusCmd::BusRd,
        addr: 0x44,
        data: 0,
        shared: false,
    };
    let provided = cache.snoop(&mut trans).expect("modified holder provides");
    assert_eq!(provided[0], 1, "block carries the committed store");
    assert!(trans.shared);
    assert_eq!(cache.state_of(0x40), MesiState::Shared);
}

#[test]
fn snoop_busrd_on_exclusive_asserts_shared_without_providing() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(300), BusCmd::BusRd, false);

    let mut trans = BusTransaction {
        origid: 1,
        cmd: BusCmd::BusRd,
        addr: 0x40,
        data: 0,
        shared: false,
    };
    assert!(cache.snoop(&mut trans).is_none());
    assert!(trans.shared);
    assert_eq!(cache.state_of(0x40), MesiState::Shared);
}

#[test]
fn snoop_busrdx_invalidates_any_holder() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(300), BusCmd::BusRd, true);

    let mut trans = BusTransaction {
        origid: 1,
        cmd: BusCmd::BusRdX,
        addr: 0x40,
        data: 0,
        shared: false,
    };
    assert!(cache.snoop(&mut trans).is_none());
    assert_eq!(cache.state_of(0x40), MesiState::Invalid);
}

#[test]
fn snoop_ignores_other_blocks() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(300), BusCmd::BusRd, false);

    // Same index (0x40 and 0x240 share set 8), different tag.
    assert_eq!(index_of(0x40), index_of(0x240));
    let mut trans = BusTransaction {
        origid: 1,
        cmd: BusCmd::BusRdX,
        addr: 0x240,
        data: 0,
        shared: false,
    };
    assert!(cache.snoop(&mut trans).is_none());
    assert!(!trans.shared);
    assert_eq!(cache.state_of(0x40), MesiState::Exclusive);
}

#[test]
fn miss_over_modified_victim_requests_writeback_first() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();
    assert!(!cache.write(0x40, 7, 0, &mut bus));
    fill_block(&mut cache, 0x40, &words(400), BusCmd::BusRdX, false);
    assert_eq!(cache.state_of(0x40), MesiState::Modified);

    // Clear the parked BusRdX as the bus would on grant.
    let mut bus = BusArbiter::new();

    // A read of the conflicting block must write the victim back first.
    assert_eq!(cache.read(0x240, 0, &mut bus), None);
    let req = bus.pending_request(0).expect("victim write-back parked");
    assert_eq!(req.cmd, BusCmd::Flush);
    assert_eq!(req.addr, 0x40, "write-back names the victim block base");
}

#[test]
fn clean_victim_is_dropped_silently() {
    let mut cache = DataCache::new();
    let mut bus = BusArbiter::new();
    fill_block(&mut cache, 0x40, &words(400), BusCmd::BusRd, false);

    assert_eq!(cache.read(0x240, 0, &mut bus), None);
    let req = bus.pending_request(0).expect("demand miss parked");
    assert_eq!(req.cmd, BusCmd::BusRd);
    assert_eq!(req.addr, 0x240);
}

#[test]
fn invalidate_block_requires_matching_tag() {
    let mut cache = DataCache::new();
    fill_block(&mut cache, 0x40, &words(400), BusCmd::BusRd, false);

    cache.invalidate_block(0x240);
    assert_eq!(cache.state_of(0x40), MesiState::Exclusive, "tag mismatch ignored");
    cache.invalidate_block(0x40);
    assert_eq!(cache.state_of(0x40), MesiState::Invalid);
}
