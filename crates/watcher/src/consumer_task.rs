// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ring consumer task: looks up the callback registered for each
//! dispatched event's path and invokes it, pacing itself per the
//! resolved processing strategy.

use crate::table::WatchedFileTable;
use argus_core::{ErrorHandler, FileChangeEvent};
use argus_ring::{drain_batch, CallbackLookup, Ring, ResolvedStrategy};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct TableLookup {
    table: Arc<WatchedFileTable>,
}

impl CallbackLookup for TableLookup {
    fn dispatch(&self, event: &FileChangeEvent) {
        if let Some(callback) = self.table.callback(Path::new(event.path_str())) {
            callback(event);
        }
    }
}

fn idle_delay(strategy: ResolvedStrategy) -> Duration {
    match strategy {
        ResolvedStrategy::SingleEvent => Duration::from_micros(200),
        ResolvedStrategy::SmallBatch => Duration::from_millis(1),
        ResolvedStrategy::LargeBatch => Duration::from_millis(2),
    }
}

pub async fn run(
    ring: Arc<Ring>,
    table: Arc<WatchedFileTable>,
    strategy: ResolvedStrategy,
    error_handler: ErrorHandler,
    mut shutdown: watch::Receiver<bool>,
) {
    let lookup = TableLookup { table };
    loop {
        if ring.is_empty() {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(idle_delay(strategy)) => {}
                _ = shutdown.changed() => {}
            }
            continue;
        }
        drain_batch(&ring, strategy, &lookup, &error_handler);
    }
    // Drain whatever is left so no event visible at shutdown time is lost.
    while !ring.is_empty() {
        drain_batch(&ring, strategy, &lookup, &error_handler);
    }
}

#[cfg(test)]
#[path = "consumer_task_tests.rs"]
mod tests;
