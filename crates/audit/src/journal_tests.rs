// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use argus_core::{Level, ProcessIdentity};
use indexmap::IndexMap;

fn sample_event() -> AuditEvent {
    AuditEvent::new(
        "2026-01-01T00:00:00.000000000Z".to_string(),
        Level::Info,
        "file_created".to_string(),
        "watcher".to_string(),
        Some("/a/b.toml".to_string()),
        None,
        Some(serde_json::json!({"size": 12})),
        &ProcessIdentity {
            pid: 1,
            name: "argus".to_string(),
        },
        IndexMap::new(),
    )
}

#[test]
fn write_below_threshold_is_not_yet_on_disk_until_flushed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.log");
    let mut backend = TextJournalBackend::open(&path, 10).unwrap();

    backend.write(&sample_event()).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

    backend.flush().unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("file_created"));
}

#[test]
fn buffer_size_threshold_triggers_automatic_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.log");
    let mut backend = TextJournalBackend::open(&path, 2).unwrap();

    backend.write(&sample_event()).unwrap();
    backend.write(&sample_event()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn close_is_idempotent_and_writes_after_close_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.log");
    let mut backend = TextJournalBackend::open(&path, 10).unwrap();

    backend.write(&sample_event()).unwrap();
    backend.close().unwrap();
    backend.close().unwrap();

    assert!(matches!(backend.write(&sample_event()), Err(AuditError::Closed)));
}
