// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use argus_core::SecurityViolation;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("path rejected: {path:?}: {violation}")]
    SecurityRejected {
        path: PathBuf,
        violation: SecurityViolation,
    },

    #[error("watcher is already running")]
    AlreadyRunning,

    #[error("watcher is not running")]
    NotRunning,

    #[error("ring capacity could not be allocated: {0}")]
    RingAllocation(String),
}
