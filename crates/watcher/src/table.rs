// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The watched-file table: read-mostly, mutated under a short exclusive
//! critical section by register/unregister, read by the polling task
//! under a shared critical section.

use argus_core::{FileCallback, StatSnapshot, WatchedFile};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A watched file plus the bookkeeping the polling loop needs to detect
/// transitions — kept out of `argus_core::WatchedFile` itself, which
/// models only the path/callback/ever-existed triple the data model
/// section names.
struct Entry {
    watched: WatchedFile,
    last_snapshot: StatSnapshot,
}

pub struct WatchedFileTable {
    entries: RwLock<HashMap<PathBuf, Entry>>,
    max_files: usize,
}

impl WatchedFileTable {
    pub fn new(max_files: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_files,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Inserts or replaces the callback for `path`. Idempotent
    /// re-registration preserves `ever_existed` and the last snapshot.
    pub fn insert(&self, path: PathBuf, callback: FileCallback) {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(&path) {
            entry.watched.replace_callback(callback);
        } else {
            entries.insert(
                path.clone(),
                Entry {
                    watched: WatchedFile::new(path, callback),
                    last_snapshot: StatSnapshot::missing(),
                },
            );
        }
    }

    pub fn remove(&self, path: &Path) {
        self.entries.write().remove(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }

    /// A copy-on-read snapshot of the currently watched paths, for the
    /// polling task to iterate without holding the table lock for the
    /// duration of a tick.
    pub fn snapshot_paths(&self) -> Vec<PathBuf> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn callback(&self, path: &Path) -> Option<FileCallback> {
        self.entries.read().get(path).map(|e| e.watched.callback().clone())
    }

    /// Compares `current` against the path's last observed snapshot,
    /// updates the stored snapshot and `ever_existed` flag, and returns
    /// the prior snapshot for the caller to derive a transition from.
    /// Returns `None` if the path was unregistered concurrently.
    pub fn observe(&self, path: &Path, current: StatSnapshot) -> Option<StatSnapshot> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(path)?;
        let previous = entry.last_snapshot;
        entry.last_snapshot = current;
        if current.exists {
            entry.watched.mark_existed();
        }
        Some(previous)
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
