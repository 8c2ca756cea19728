// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The polling task: one tick per interval, stat-and-compare over the
//! watched set, emit events into the ring.

use crate::cache::StatCache;
use crate::table::WatchedFileTable;
use argus_core::{ArgusError, ChangeKind, Clock, ErrorHandler, FileChangeEvent, StatSnapshot};
use argus_ring::Ring;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub async fn run(
    table: Arc<WatchedFileTable>,
    cache: Arc<StatCache>,
    ring: Arc<Ring>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    error_handler: ErrorHandler,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                tick(&table, &cache, &ring, clock.as_ref(), &error_handler);
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

fn tick(
    table: &WatchedFileTable,
    cache: &StatCache,
    ring: &Ring,
    clock: &dyn Clock,
    error_handler: &ErrorHandler,
) {
    for path in table.snapshot_paths() {
        let snapshot = cache.get_or_probe(&path, clock);

        if let Some(kind) = snapshot.error_kind {
            // Transient stat failure: report it, but leave the path's
            // last-observed snapshot untouched so a later good read is
            // compared against the last real state, not the error.
            error_handler(ArgusError::Io(std::io::Error::from(kind)));
            continue;
        }

        let Some(previous) = table.observe(&path, snapshot) else {
            continue; // unregistered concurrently with this tick
        };

        if let Some(kind) = transition(&previous, &snapshot) {
            let event = FileChangeEvent::new(&path, snapshot.mtime_nanos, snapshot.size, kind);
            if ring.push_overwriting(event) {
                report_overflow(ring, error_handler);
            }
        }
    }
}

/// Derives the transition (if any) between two snapshots, per §4.1's
/// comparison rule: presence changes always win; among two present
/// snapshots, either timestamp or size differing counts as a
/// modification.
fn transition(previous: &StatSnapshot, current: &StatSnapshot) -> Option<ChangeKind> {
    match (previous.exists, current.exists) {
        (false, true) => Some(ChangeKind::Created),
        (true, false) => Some(ChangeKind::Deleted),
        (true, true) if current.differs_from(previous) => Some(ChangeKind::Modified),
        _ => None,
    }
}

/// Ring overflow is surfaced via the error callback with a throttled
/// notice rather than on every single drop — only at the first drop and
/// every hundredth one thereafter.
fn report_overflow(ring: &Ring, error_handler: &ErrorHandler) {
    let count = ring.overflow_count();
    if count == 1 || count % 100 == 0 {
        error_handler(ArgusError::Configuration(format!(
            "ring overflow: {count} events dropped since start"
        )));
    }
}

#[cfg(test)]
#[path = "poll_task_tests.rs"]
mod tests;
