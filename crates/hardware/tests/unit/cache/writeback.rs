//! Writeback Notification Tests.
//!
//! Verifies that dirty lines leaving the cache, by replacement or flush, are
//! reported exactly once to the attached sink and clean lines never are.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cachesim_core::config::ReplacementPolicy as PolicyType;
use cachesim_core::{AccessContext, Eviction};

use crate::common::harness::{Clock, cache, touch};
use crate::common::mocks::{MockSink, RecordingSink};

#[test]
fn dirty_eviction_is_written_back_once() {
    let mut sink = MockSink::new();
    sink.expect_writeback()
        .withf(|e: &Eviction| e.address == 0x10 && e.dirty && e.set == 0 && e.way == 0)
        .times(1)
        .return_const(());

    let mut c = cache(1, 1, PolicyType::Lru);
    c.set_writeback_sink(Box::new(sink));
    let mut clock = Clock::default();

    assert!(!touch(&mut c, 0x10, true, &clock.tick()));
    let evicted = c.install(0x20, &clock.tick()).evicted().unwrap();
    assert!(evicted.dirty);
    assert_eq!(evicted.address, 0x10);
}

#[test]
fn clean_eviction_is_not_written_back() {
    let mut sink = MockSink::new();
    sink.expect_writeback().never();

    let mut c = cache(1, 1, PolicyType::Srrip);
    c.set_writeback_sink(Box::new(sink));
    let mut clock = Clock::default();

    assert!(!touch(&mut c, 0x10, false, &clock.tick()));
    let evicted = c.install(0x20, &clock.tick()).evicted().unwrap();
    assert!(!evicted.dirty);
}

#[test]
fn invalidate_discards_dirty_data_silently() {
    let mut sink = MockSink::new();
    sink.expect_writeback().never();

    let mut c = cache(2, 2, PolicyType::Lru);
    c.set_writeback_sink(Box::new(sink));
    let ctx = AccessContext::at(1);
    touch(&mut c, 4, true, &ctx);
    assert!(c.invalidate(4));
    assert_eq!(c.flush(), 0);
}

#[test]
fn flush_writes_back_every_dirty_line() {
    let log = RecordingSink::new();
    let mut c = cache(4, 2, PolicyType::Drrip);
    c.set_writeback_sink(Box::new(log.clone()));
    let mut clock = Clock::default();

    for (addr, write) in [(0, true), (1, false), (2, true), (6, true), (3, false)] {
        touch(&mut c, addr, write, &clock.tick());
    }

    assert_eq!(c.flush(), 3);
    let mut written: Vec<u64> = log.entries().iter().map(|e| e.address).collect();
    written.sort_unstable();
    assert_eq!(written, vec![0, 2, 6]);
    assert!(log.entries().iter().all(|e| e.dirty));

    assert!((0..4).all(|set| c.valid_lines(set) == 0));
    assert_eq!(c.flush(), 0);
    assert_eq!(log.entries().len(), 3);
}

#[test]
fn eviction_reports_owner() {
    let log = RecordingSink::new();
    let mut c = cache(1, 1, PolicyType::Random);
    c.set_writeback_sink(Box::new(log.clone()));

    touch(&mut c, 0x40, true, &AccessContext::at(1).with_owner(3));
    let _ = c.install(0x80, &AccessContext::at(2).with_owner(1));

    assert_eq!(
        log.entries(),
        vec![Eviction {
            address: 0x40,
            set: 0,
            way: 0,
            dirty: true,
            owner_id: 3,
        }]
    );
    assert_eq!(c.line(0, 0).unwrap().owner_id, 1);
}

#[test]
fn closures_are_sinks() {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);

    let mut c = cache(1, 2, PolicyType::Ship);
    c.set_writeback_sink(Box::new(move |_: &Eviction| {
        seen.fetch_add(1, Ordering::Relaxed);
    }));
    let mut clock = Clock::default();

    for addr in 0..10 {
        touch(&mut c, addr, true, &clock.tick());
    }
    assert_eq!(count.load(Ordering::Relaxed), 8);
    assert_eq!(c.flush(), 2);
    assert_eq!(count.load(Ordering::Relaxed), 10);
}

#[test]
fn no_sink_still_counts_dirty_lines() {
    let mut c = cache(1, 2, PolicyType::Lru);
    let mut clock = Clock::default();
    touch(&mut c, 1, true, &clock.tick());
    touch(&mut c, 2, false, &clock.tick());

    assert!(c.take_writeback_sink().is_none());
    assert_eq!(c.flush(), 1);
}

#[test]
fn detached_sink_stops_receiving() {
    let log = RecordingSink::new();
    let mut c = cache(1, 1, PolicyType::Lru);
    c.set_writeback_sink(Box::new(log.clone()));
    assert!(c.take_writeback_sink().is_some());

    let mut clock = Clock::default();
    touch(&mut c, 1, true, &clock.tick());
    let _ = c.install(2, &clock.tick());
    assert!(log.entries().is_empty());
}
