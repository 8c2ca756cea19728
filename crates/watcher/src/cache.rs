// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path-keyed stat cache. Read-mostly: the polling task both reads and
//! writes it; introspection callers take a shared critical section.

use argus_core::{CacheEntry, Clock, StatSnapshot};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct StatCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
    ttl: Duration,
}

impl StatCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remove(&self, path: &Path) {
        self.entries.write().remove(path);
    }

    /// Returns the cached snapshot if it is still within its TTL;
    /// otherwise probes the filesystem, refreshes the cache, and returns
    /// the fresh snapshot.
    pub fn get_or_probe(&self, path: &Path, clock: &dyn Clock) -> StatSnapshot {
        let now = clock.now_nanos();
        if let Some(entry) = self.entries.read().get(path) {
            if !entry.is_stale(now, self.ttl) {
                return entry.snapshot;
            }
        }
        let snapshot = probe(path, clock);
        self.entries
            .write()
            .insert(path.to_path_buf(), CacheEntry::new(snapshot, now));
        snapshot
    }
}

/// Probes the filesystem for a path's current metadata. A "not found"
/// error is reported as a plain `StatSnapshot::missing()`, not an error
/// tag — only unexpected stat failures (permission denied, I/O error)
/// populate `error_kind`.
pub fn probe(path: &Path, clock: &dyn Clock) -> StatSnapshot {
    match std::fs::metadata(path) {
        Ok(meta) => {
            let mtime_nanos = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_nanos() as i64)
                .unwrap_or_else(|| clock.now_nanos());
            StatSnapshot {
                mtime_nanos,
                size: meta.len(),
                exists: true,
                error_kind: None,
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatSnapshot::missing(),
        Err(e) => StatSnapshot::errored(e.kind()),
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
