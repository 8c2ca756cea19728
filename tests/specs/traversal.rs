// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 6: traversal rejection.

use crate::prelude::*;
use argus_daemon::Argus;
use argus_watcher::WatcherError;
use std::sync::Arc;

#[test]
fn registering_a_traversal_path_is_rejected_and_audited_without_growing_the_watched_set() {
    let dir = tempfile::tempdir().unwrap();
    let argus = Argus::new(settings_in(dir.path())).unwrap();

    let err = argus.register("../../etc/passwd", Arc::new(|_| {})).unwrap_err();
    assert!(matches!(err, WatcherError::SecurityRejected { .. }));
    assert_eq!(argus.introspect().watched_count, 0);

    let stats = argus.introspect().audit.unwrap();
    assert_eq!(stats.written, 1, "the rejection is audited within the same synchronous call");
}
