// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level audit pipeline: backend selection (with fallback),
//! severity filtering, and idempotent shutdown.

use crate::backend::AuditBackend;
use crate::db::DbBackend;
use crate::error::AuditError;
use crate::journal::TextJournalBackend;
use argus_core::{AuditEvent, AuditSettings, Clock, Level, ProcessIdentity};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Opens the backend implied by `path`'s extension (`.db`/`.sqlite` select
/// the embedded database, anything else selects the text journal). If
/// that backend fails to open, falls back to the other kind at a sibling
/// path before giving up.
fn open_with_fallback(path: &Path, buffer_size: usize) -> Result<Box<dyn AuditBackend>, AuditError> {
    let wants_db = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("db") | Some("sqlite") | Some("sqlite3")
    );

    let (primary, fallback_path): (Result<Box<dyn AuditBackend>, AuditError>, _) = if wants_db {
        (
            DbBackend::open(path, buffer_size).map(|b| Box::new(b) as Box<dyn AuditBackend>),
            path.with_extension("journal"),
        )
    } else {
        (
            TextJournalBackend::open(path, buffer_size).map(|b| Box::new(b) as Box<dyn AuditBackend>),
            path.with_extension("db"),
        )
    };

    match primary {
        Ok(backend) => Ok(backend),
        Err(primary_err) => {
            tracing::warn!(
                path = %path.display(),
                error = %primary_err,
                "primary audit backend failed to open, falling back"
            );
            let fallback: Result<Box<dyn AuditBackend>, AuditError> = if wants_db {
                TextJournalBackend::open(&fallback_path, buffer_size)
                    .map(|b| Box::new(b) as Box<dyn AuditBackend>)
            } else {
                DbBackend::open(&fallback_path, buffer_size).map(|b| Box::new(b) as Box<dyn AuditBackend>)
            };
            fallback.map_err(|_| AuditError::NoBackendAvailable)
        }
    }
}

#[derive(Debug, Default)]
pub struct AuditStats {
    pub written: u64,
    pub filtered: u64,
    pub write_errors: u64,
}

/// Owns the selected backend and decides, per event, whether it clears
/// the configured severity floor before it's written.
pub struct AuditPipeline {
    backend: Mutex<Box<dyn AuditBackend>>,
    min_level: Level,
    identity: ProcessIdentity,
    clock: Arc<dyn Clock>,
    written: AtomicU64,
    filtered: AtomicU64,
    write_errors: AtomicU64,
    closed: AtomicBool,
}

impl AuditPipeline {
    pub fn open(settings: &AuditSettings, clock: Arc<dyn Clock>) -> Result<Self, AuditError> {
        let backend = open_with_fallback(&settings.output_path, settings.buffer_size)?;
        Ok(Self {
            backend: Mutex::new(backend),
            min_level: settings.min_level,
            identity: ProcessIdentity::current(),
            clock,
            written: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.lock().name()
    }

    /// Records one audit event if `level` clears the configured floor.
    /// Construction of the checksum-sealed `AuditEvent` happens here so
    /// callers never have to touch timestamps or process identity.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        level: Level,
        event: &str,
        component: &str,
        file_path: Option<String>,
        old_value: Option<serde_json::Value>,
        new_value: Option<serde_json::Value>,
        context: IndexMap<String, serde_json::Value>,
    ) -> Result<(), AuditError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AuditError::Closed);
        }
        if level < self.min_level {
            self.filtered.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        let timestamp = self.clock.now_rfc3339();
        let record = AuditEvent::new(
            timestamp,
            level,
            event.to_string(),
            component.to_string(),
            file_path,
            old_value,
            new_value,
            &self.identity,
            context,
        );

        let mut backend = self.backend.lock();
        match backend.write(&record) {
            Ok(()) => {
                self.written.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.write_errors.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    pub fn flush(&self) -> Result<(), AuditError> {
        self.backend.lock().flush()
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats {
            written: self.written.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }

    /// Flushes and closes the backend. Idempotent: a second call observes
    /// `closed` already set and returns immediately without touching the
    /// backend again.
    pub fn close(&self) -> Result<(), AuditError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.backend.lock().close()
    }
}

impl Drop for AuditPipeline {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Acquire) {
            if let Err(e) = self.backend.lock().close() {
                tracing::warn!(error = %e, "error closing audit backend on drop");
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
