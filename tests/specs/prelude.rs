// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the workspace-level black-box scenarios.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use argus_core::{FileChangeEvent, Settings};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Fast-polling settings suitable for tests, with the audit journal
/// pointed at `dir`.
pub fn settings_in(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.poll_interval = POLL_INTERVAL;
    settings.cache_ttl = Duration::from_nanos(1);
    settings.ring_capacity = 8;
    settings.audit.output_path = dir.join("events.journal");
    settings.audit.buffer_size = 1;
    settings
}

/// Collects every event delivered to it, for assertion after a test's
/// watcher has been stopped.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<FileChangeEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self) -> argus_core::FileCallback {
        let log = self.clone();
        Arc::new(move |event: &FileChangeEvent| log.0.lock().push(event.clone()))
    }

    pub fn events(&self) -> Vec<FileChangeEvent> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }
}

/// Polls `condition` until it returns `true` or `timeout` elapses.
pub async fn wait_for<F: Fn() -> bool>(timeout: Duration, condition: F) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
