// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 4: overflow against a concurrent, slow single consumer.
//!
//! Ring capacity 8, one consumer thread that pauses between drains (the
//! scenario's "blocks for 1 s" is scaled down here so the test stays
//! fast), a producer pushing 20 events for distinct paths in rapid
//! succession with no pause between pushes. The dropped-events counter
//! is incremented exactly once per eviction (`argus_ring::Ring`'s own
//! invariant), and the burst completes long before a 1-event-per-tick
//! consumer can take even one of them, so pushes 1-8 fill the empty
//! ring and each of pushes 9-20 evicts the current oldest occupant:
//! 20 - 8 = 12 drops, leaving the 8 most recent events for the consumer
//! to drain afterward, in order.

use argus_core::{ChangeKind, FileChangeEvent};
use argus_ring::Ring;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn twenty_pushes_against_a_slow_concurrent_consumer_drop_twelve_and_deliver_the_eight_most_recent_in_order()
{
    let ring = Arc::new(Ring::new(8));
    let drained = Arc::new(Mutex::new(Vec::new()));

    let consumer = {
        let ring = ring.clone();
        let drained = drained.clone();
        thread::spawn(move || {
            for _ in 0..8 {
                loop {
                    if let Some(event) = ring.try_pop() {
                        drained.lock().push(event);
                        break;
                    }
                    thread::sleep(Duration::from_millis(5));
                }
                thread::sleep(Duration::from_millis(25));
            }
        })
    };

    for i in 0..20 {
        let path = PathBuf::from(format!("/watched/f{i}"));
        let event = FileChangeEvent::new(&path, i as i64, i as u64, ChangeKind::Modified);
        ring.push_overwriting(event);
    }

    consumer.join().unwrap();

    assert_eq!(ring.overflow_count(), 12);
    assert!(ring.is_empty());

    let drained = drained.lock();
    assert_eq!(drained.len(), 8);
    for (idx, expected) in (12..20).enumerate() {
        assert_eq!(drained[idx].path_str(), format!("/watched/f{expected}"));
    }
}
