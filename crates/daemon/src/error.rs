// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the top-level `Argus` handle, unifying the
/// watcher's and audit pipeline's distinct error types behind one type
/// callers of this crate need to match on.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Watcher(#[from] argus_watcher::WatcherError),
    #[error(transparent)]
    Audit(#[from] argus_audit::AuditError),
    #[error(transparent)]
    Config(#[from] argus_core::ArgusError),
}
