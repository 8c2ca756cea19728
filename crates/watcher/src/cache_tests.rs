// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use argus_core::FakeClock;

#[test]
fn probe_reports_missing_for_nonexistent_path() {
    let clock = FakeClock::default();
    let snap = probe(Path::new("/nonexistent/does/not/exist"), &clock);
    assert!(!snap.exists);
    assert!(snap.error_kind.is_none());
}

#[test]
fn probe_reports_existing_file_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.txt");
    std::fs::write(&path, b"hello").unwrap();
    let clock = FakeClock::default();
    let snap = probe(&path, &clock);
    assert!(snap.exists);
    assert_eq!(snap.size, 5);
}

#[test]
fn cache_reuses_snapshot_within_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.txt");
    std::fs::write(&path, b"abc").unwrap();

    let clock = FakeClock::default();
    let cache = StatCache::new(Duration::from_secs(10));
    let first = cache.get_or_probe(&path, &clock);

    // Mutate the file without advancing the clock: the cached snapshot
    // should still be returned, proving the filesystem wasn't re-probed.
    std::fs::write(&path, b"a much longer replacement").unwrap();
    let second = cache.get_or_probe(&path, &clock);
    assert_eq!(first.size, second.size);
}

#[test]
fn cache_refreshes_after_ttl_expires() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.txt");
    std::fs::write(&path, b"abc").unwrap();

    let clock = FakeClock::default();
    let cache = StatCache::new(Duration::from_secs(1));
    let first = cache.get_or_probe(&path, &clock);

    std::fs::write(&path, b"a much longer replacement").unwrap();
    clock.advance(Duration::from_secs(2));
    let second = cache.get_or_probe(&path, &clock);
    assert_ne!(first.size, second.size);
}

#[test]
fn remove_evicts_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.txt");
    std::fs::write(&path, b"abc").unwrap();
    let clock = FakeClock::default();
    let cache = StatCache::new(Duration::from_secs(10));
    cache.get_or_probe(&path, &clock);
    assert_eq!(cache.len(), 1);
    cache.remove(&path);
    assert!(cache.is_empty());
}
