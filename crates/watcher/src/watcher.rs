// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The public `Watcher` handle: register/unregister watched paths, then
//! start/stop the polling and consumer tasks that turn stat diffs into
//! delivered callbacks.

use crate::cache::StatCache;
use crate::error::WatcherError;
use crate::table::WatchedFileTable;
use crate::{consumer_task, poll_task};
use argus_core::{security_gate, Clock, ErrorHandler, FileCallback, Settings, SystemClock};
use argus_ring::{normalize_capacity, Ring};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct RunningTasks {
    shutdown: watch::Sender<bool>,
    poll_handle: JoinHandle<()>,
    consumer_handle: JoinHandle<()>,
}

/// Owns the watched-file table, stat cache, and event ring for one
/// configured watcher instance. Cheap to construct; `start`/`stop` drive
/// the actual background work.
pub struct Watcher {
    table: Arc<WatchedFileTable>,
    cache: Arc<StatCache>,
    ring: Arc<Ring>,
    clock: Arc<dyn Clock>,
    settings: Settings,
    error_handler: ErrorHandler,
    running: Mutex<Option<RunningTasks>>,
}

impl Watcher {
    pub fn new(settings: Settings, error_handler: ErrorHandler) -> Self {
        Self::with_clock(settings, error_handler, Arc::new(SystemClock))
    }

    /// Same as [`Watcher::new`] but with an injectable clock, for tests
    /// that need deterministic timestamps.
    pub fn with_clock(settings: Settings, error_handler: ErrorHandler, clock: Arc<dyn Clock>) -> Self {
        let (ring_capacity, clamped) = normalize_capacity(settings.ring_capacity);
        if clamped {
            error_handler(argus_core::ArgusError::RingAllocation {
                requested: settings.ring_capacity,
                reason: "capacity must be a power of two within the allowed range".to_string(),
            });
        }
        Self {
            table: Arc::new(WatchedFileTable::new(settings.max_watched_files)),
            cache: Arc::new(StatCache::new(settings.cache_ttl)),
            ring: Arc::new(Ring::new(ring_capacity)),
            clock,
            settings,
            error_handler,
            running: Mutex::new(None),
        }
    }

    /// Registers `path` for watching with `callback`. Runs the path
    /// through the security gate and the watched-file capacity check
    /// before inserting; re-registering an already-watched path replaces
    /// its callback without disturbing `ever_existed` or the last
    /// observed snapshot.
    pub fn register(&self, path: impl AsRef<Path>, callback: FileCallback) -> Result<(), WatcherError> {
        let path = path.as_ref();
        let already_present = self.table.contains(path);
        let existing_count = if already_present { self.table.len() - 1 } else { self.table.len() };
        security_gate(path, existing_count, self.settings.max_watched_files).map_err(|violation| {
            WatcherError::SecurityRejected {
                path: path.to_path_buf(),
                violation,
            }
        })?;
        self.table.insert(path.to_path_buf(), callback);
        Ok(())
    }

    pub fn unregister(&self, path: &Path) {
        self.table.remove(path);
        self.cache.remove(path);
    }

    pub fn watched_count(&self) -> usize {
        self.table.len()
    }

    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    pub fn overflow_count(&self) -> u64 {
        self.ring.overflow_count()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Starts the polling and consumer tasks. A no-op (returns `Ok`) if
    /// already running. The `Auto` strategy is resolved from the watched
    /// count observed right now and latched for the consumer's lifetime.
    pub fn start(&self) -> Result<(), WatcherError> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Ok(());
        }

        let strategy = argus_ring::ResolvedStrategy::resolve(
            self.settings.optimization_strategy,
            self.table.len(),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let poll_handle = tokio::spawn(poll_task::run(
            self.table.clone(),
            self.cache.clone(),
            self.ring.clone(),
            self.clock.clone(),
            self.settings.poll_interval,
            self.error_handler.clone(),
            shutdown_rx.clone(),
        ));
        let consumer_handle = tokio::spawn(consumer_task::run(
            self.ring.clone(),
            self.table.clone(),
            strategy,
            self.error_handler.clone(),
            shutdown_rx,
        ));

        *running = Some(RunningTasks {
            shutdown: shutdown_tx,
            poll_handle,
            consumer_handle,
        });
        Ok(())
    }

    /// Signals both tasks to stop and waits for the consumer to fully
    /// drain the ring. A no-op if not running.
    pub async fn stop(&self) -> Result<(), WatcherError> {
        let tasks = self.running.lock().take();
        let Some(tasks) = tasks else {
            return Ok(());
        };
        let _ = tasks.shutdown.send(true);
        let _ = tasks.poll_handle.await;
        let _ = tasks.consumer_handle.await;
        Ok(())
    }

    /// Like [`Watcher::stop`] but bounded by `deadline`. Returns `true` if
    /// shutdown completed within the deadline, `false` if it timed out
    /// (in which case the background tasks may still be running).
    pub async fn graceful_stop(&self, deadline: Duration) -> bool {
        tokio::time::timeout(deadline, self.stop()).await.is_ok()
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
