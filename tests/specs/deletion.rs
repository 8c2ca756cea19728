// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 3: deletion during watch.

use crate::prelude::*;
use argus_watcher::Watcher;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn deleting_a_watched_file_is_reported_and_recreating_it_is_reported_as_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goes_away.conf");
    std::fs::write(&path, b"content").unwrap();

    let settings = settings_in(dir.path());
    let watcher = Watcher::new(settings, Arc::new(|_| {}));
    let log = EventLog::new();
    watcher.register(&path, log.callback()).unwrap();
    watcher.start().unwrap();

    assert!(wait_for(POLL_INTERVAL * 4, || log.len() >= 1).await);

    std::fs::remove_file(&path).unwrap();
    assert!(wait_for(POLL_INTERVAL * 4, || log.events().iter().any(|e| e.is_deleted())).await);
    assert_eq!(watcher.watched_count(), 1, "the path stays in the watched set after deletion");

    std::fs::write(&path, b"back again").unwrap();
    assert!(
        wait_for(POLL_INTERVAL * 4, || log.events().iter().filter(|e| e.is_created()).count() >= 2)
            .await,
        "recreating the file after deletion must produce a second created event"
    );

    watcher.graceful_stop(Duration::from_secs(5)).await;
}
