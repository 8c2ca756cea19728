// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 1: creation-after-registration.

use crate::prelude::*;
use argus_daemon::Argus;
use std::time::Duration;

#[tokio::test]
async fn creating_a_registered_but_absent_file_delivers_a_created_event_and_audits_it() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let argus = Argus::new(settings).unwrap();

    let path = dir.path().join("c.json");
    let log = EventLog::new();
    argus.register(&path, log.callback()).unwrap();

    argus.start().unwrap();
    tokio::time::sleep(POLL_INTERVAL * 2).await;

    std::fs::write(&path, br#"{"a":1}"#).unwrap();

    let delivered = wait_for(POLL_INTERVAL * 4, || {
        log.events().iter().any(|e| e.is_created() && e.path_str() == path.to_string_lossy())
    })
    .await;
    assert!(delivered, "created event must be delivered within two poll intervals");

    argus.graceful_stop(Duration::from_secs(5)).await;

    let journal = std::fs::read_to_string(dir.path().join("events.journal")).unwrap();
    let config_changes = journal.lines().filter(|l| l.contains(r#""event":"config_change""#)).count();
    assert!(config_changes >= 1, "audit log must contain at least one config_change event");
    assert!(journal.contains(r#""level":"critical""#));
}
