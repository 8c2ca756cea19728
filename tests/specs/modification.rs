// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 2: modification with identical timestamp but different size.

use crate::prelude::*;
use argus_watcher::Watcher;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn a_size_change_is_reported_even_when_the_timestamp_does_not_move() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pinned.conf");
    std::fs::write(&path, b"short").unwrap();
    let pinned_mtime = std::fs::metadata(&path).unwrap().modified().unwrap();

    let settings = settings_in(dir.path());
    let watcher = Watcher::new(settings, Arc::new(|_| {}));
    let log = EventLog::new();
    watcher.register(&path, log.callback()).unwrap();
    watcher.start().unwrap();

    // The spurious first-tick "created" event for an already-existing file.
    assert!(wait_for(POLL_INTERVAL * 4, || log.len() >= 1).await);

    std::fs::write(&path, b"a much longer replacement body").unwrap();
    let file = std::fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(pinned_mtime).unwrap();
    drop(file);

    let saw_modification = wait_for(POLL_INTERVAL * 6, || {
        log.events().iter().any(|e| e.is_modified() && e.path_str() == path.to_string_lossy())
    })
    .await;
    assert!(saw_modification, "a size-only change must still be reported as a modification");

    watcher.graceful_stop(Duration::from_secs(5)).await;
}
