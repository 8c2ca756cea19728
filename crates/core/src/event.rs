// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The value type carried by the ring buffer.
//!
//! The path is stored inline as a fixed-size byte buffer with a length
//! prefix rather than a heap-allocated `String` or `PathBuf`: this is the
//! zero-per-event-allocation transport the ring buffer's wait-free
//! publication protocol depends on.

use std::path::Path;

/// Maximum path length a `FileChangeEvent` can carry. Matches the path
/// security gate's hard length limit, so a path accepted by the gate
/// always fits.
pub const PATH_CAPACITY: usize = 4096;

/// Which transition a `FileChangeEvent` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Error,
}

/// A fixed-size, allocation-free record of one observed file transition.
#[derive(Clone)]
pub struct FileChangeEvent {
    path_buf: [u8; PATH_CAPACITY],
    path_len: u16,
    mtime_nanos: i64,
    size: u64,
    kind: ChangeKind,
}

impl FileChangeEvent {
    /// Builds an event, truncating (never panicking on) paths longer than
    /// [`PATH_CAPACITY`] — such paths should already have been rejected by
    /// the security gate before reaching this point.
    pub fn new(path: &Path, mtime_nanos: i64, size: u64, kind: ChangeKind) -> Self {
        let bytes = path.to_string_lossy();
        let bytes = bytes.as_bytes();
        let len = bytes.len().min(PATH_CAPACITY);
        let mut path_buf = [0u8; PATH_CAPACITY];
        path_buf[..len].copy_from_slice(&bytes[..len]);
        Self {
            path_buf,
            path_len: len as u16,
            mtime_nanos,
            size,
            kind,
        }
    }

    pub fn path_str(&self) -> &str {
        std::str::from_utf8(&self.path_buf[..self.path_len as usize]).unwrap_or_default()
    }

    pub fn mtime_nanos(&self) -> i64 {
        self.mtime_nanos
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn is_created(&self) -> bool {
        self.kind == ChangeKind::Created
    }

    pub fn is_modified(&self) -> bool {
        self.kind == ChangeKind::Modified
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }

    pub fn is_error(&self) -> bool {
        self.kind == ChangeKind::Error
    }
}

impl std::fmt::Debug for FileChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileChangeEvent")
            .field("path", &self.path_str())
            .field("mtime_nanos", &self.mtime_nanos)
            .field("size", &self.size)
            .field("kind", &self.kind)
            .finish()
    }
}

/// The per-path delivery callback. Opaque to the core: it runs on the
/// ring consumer thread and blocks further dispatch for its duration.
pub type FileCallback = std::sync::Arc<dyn Fn(&FileChangeEvent) + Send + Sync>;

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
