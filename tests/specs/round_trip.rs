// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Round-trip and idempotence laws from the testable-properties list.

use crate::prelude::*;
use argus_audit::AuditPipeline;
use argus_core::{AuditEvent, FakeClock};
use argus_watcher::Watcher;
use indexmap::IndexMap;
use std::sync::Arc;

#[test]
fn register_then_unregister_returns_the_watched_set_to_its_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let watcher = Watcher::new(settings_in(dir.path()), Arc::new(|_| {}));
    let path = dir.path().join("roundtrip.toml");

    assert_eq!(watcher.watched_count(), 0);
    watcher.register(&path, Arc::new(|_| {})).unwrap();
    watcher.unregister(&path);
    assert_eq!(watcher.watched_count(), 0);
}

#[test]
fn closing_an_audit_pipeline_twice_succeeds_both_times() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = argus_core::AuditSettings::default();
    settings.output_path = dir.path().join("events.journal");
    settings.buffer_size = 4;

    let pipeline = AuditPipeline::open(&settings, Arc::new(FakeClock::default())).unwrap();
    pipeline.close().unwrap();
    pipeline.close().unwrap();
}

#[test]
fn a_journal_event_written_then_reparsed_still_verifies_its_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = argus_core::AuditSettings::default();
    settings.output_path = dir.path().join("events.journal");
    settings.buffer_size = 1;

    let pipeline = AuditPipeline::open(&settings, Arc::new(FakeClock::default())).unwrap();
    pipeline
        .record(
            argus_core::Level::Info,
            "config_change",
            "watcher",
            Some("/tmp/a.toml".to_string()),
            None,
            Some(serde_json::json!({"a": 1})),
            IndexMap::new(),
        )
        .unwrap();
    pipeline.close().unwrap();

    let journal = std::fs::read_to_string(settings.output_path).unwrap();
    let line = journal.lines().next().unwrap();
    let event: AuditEvent = serde_json::from_str(line).unwrap();
    assert!(event.verify_checksum());
}
