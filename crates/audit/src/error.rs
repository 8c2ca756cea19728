// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("schema migration v{from}\u{2192}v{to} failed: {reason}")]
    Migration { from: u32, to: u32, reason: String },
    #[error("snapshot schema version {0} is newer than supported ({1})")]
    SchemaTooNew(u32, u32),
    #[error("no audit backend is available")]
    NoBackendAvailable,
    #[error("audit pipeline is closed")]
    Closed,
}
