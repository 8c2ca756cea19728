// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level `Argus` handle: wires the watcher, its ring, and the
//! audit pipeline together behind settings loaded once at construction.

use crate::error::DaemonError;
use argus_audit::{AuditPipeline, AuditStats};
use argus_core::{
    ArgusError, ChangeKind, Clock, ErrorHandler, FileCallback, FileChangeEvent, Level, Settings,
    SystemClock,
};
use argus_watcher::{Watcher, WatcherError};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A point-in-time snapshot of everything introspection callers might
/// want: watched-file count, ring occupancy and overflow, cache size, and
/// audit throughput.
#[derive(Debug, Clone)]
pub struct Introspection {
    pub watched_count: usize,
    pub ring_len: usize,
    pub ring_overflow_count: u64,
    pub cache_len: usize,
    pub audit: Option<AuditStats>,
}

/// Owns one configured watcher and (if enabled) one audit pipeline.
/// Background errors from the watcher are both logged and, when an audit
/// pipeline is present, recorded as audit events — so an operator reading
/// only the audit log never misses a ring overflow or a rejected
/// registration.
pub struct Argus {
    watcher: Watcher,
    audit: Option<Arc<AuditPipeline>>,
}

impl Argus {
    pub fn new(settings: Settings) -> Result<Self, DaemonError> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: Settings, clock: Arc<dyn Clock>) -> Result<Self, DaemonError> {
        let audit = if settings.audit.enabled {
            Some(Arc::new(AuditPipeline::open(&settings.audit, clock.clone())?))
        } else {
            None
        };

        let error_handler = build_error_handler(audit.clone());
        let watcher = Watcher::with_clock(settings, error_handler, clock);

        Ok(Self { watcher, audit })
    }

    /// Registers `path`. A security-gate rejection is recorded as a
    /// `Security`-level audit event (best-effort — an audit write failure
    /// is logged but does not change the registration's own error).
    ///
    /// Every delivered event for `path` is recorded as a `config_change`
    /// audit event at `Critical` before the caller's own callback runs,
    /// so the durable audit trail never depends on what that callback
    /// does.
    pub fn register(&self, path: impl AsRef<Path>, callback: FileCallback) -> Result<(), WatcherError> {
        let path = path.as_ref();
        let callback = self.wrap_with_audit(callback);
        let result = self.watcher.register(path, callback);
        if let Err(WatcherError::SecurityRejected { violation, .. }) = &result {
            self.audit_security_rejection(path, violation);
        }
        result
    }

    pub fn unregister(&self, path: &Path) {
        self.watcher.unregister(path);
    }

    pub fn start(&self) -> Result<(), WatcherError> {
        self.watcher.start()
    }

    pub async fn stop(&self) -> Result<(), WatcherError> {
        let result = self.watcher.stop().await;
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.flush() {
                tracing::warn!(error = %e, "failed to flush audit pipeline during stop");
            }
        }
        result
    }

    pub async fn graceful_stop(&self, deadline: Duration) -> bool {
        let completed = self.watcher.graceful_stop(deadline).await;
        if let Some(audit) = &self.audit {
            let _ = audit.close();
        }
        completed
    }

    pub fn introspect(&self) -> Introspection {
        Introspection {
            watched_count: self.watcher.watched_count(),
            ring_len: self.watcher.ring_len(),
            ring_overflow_count: self.watcher.overflow_count(),
            cache_len: self.watcher.cache_len(),
            audit: self.audit.as_ref().map(|a| a.stats()),
        }
    }

    /// Wraps a caller-supplied callback so every event it would receive
    /// is first recorded as a `config_change` audit event. The wrapper
    /// still runs on the ring consumer task and is still protected by
    /// that task's panic isolation, so a caller's callback panicking
    /// cannot suppress the audit write (the write already happened).
    fn wrap_with_audit(&self, callback: FileCallback) -> FileCallback {
        let Some(audit) = self.audit.clone() else {
            return callback;
        };
        Arc::new(move |event: &FileChangeEvent| {
            record_config_change(&audit, event);
            callback(event);
        })
    }

    fn audit_security_rejection(&self, path: &Path, violation: &argus_core::SecurityViolation) {
        let Some(audit) = &self.audit else { return };
        let mut context = IndexMap::new();
        context.insert("violation".to_string(), serde_json::json!(violation.to_string()));
        if let Err(e) = audit.record(
            Level::Security,
            "registration_rejected",
            "watcher",
            Some(path.to_string_lossy().into_owned()),
            None,
            None,
            context,
        ) {
            tracing::warn!(error = %e, "failed to record security-rejection audit event");
        }
    }
}

/// Records one delivered file-change event as a `config_change` audit
/// event at `Critical`. Write failures are logged, not propagated — the
/// callback dispatch path has no caller to return an error to.
fn record_config_change(audit: &AuditPipeline, event: &FileChangeEvent) {
    let mut context = IndexMap::new();
    context.insert("kind".to_string(), serde_json::json!(change_kind_label(event.kind())));
    context.insert("size".to_string(), serde_json::json!(event.size()));
    if let Err(e) = audit.record(
        Level::Critical,
        "config_change",
        "watcher",
        Some(event.path_str().to_string()),
        None,
        None,
        context,
    ) {
        tracing::warn!(error = %e, path = event.path_str(), "failed to record config_change audit event");
    }
}

fn change_kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Created => "created",
        ChangeKind::Modified => "modified",
        ChangeKind::Deleted => "deleted",
        ChangeKind::Error => "error",
    }
}

/// Builds the watcher's background error handler: always logged via
/// `tracing`, and mirrored into the audit pipeline (if any) as a
/// `Critical`-level event so ring overflows and callback panics survive
/// in the durable audit trail, not just the process log.
fn build_error_handler(audit: Option<Arc<AuditPipeline>>) -> ErrorHandler {
    let last_audit_error_logged = Arc::new(Mutex::new(false));
    Arc::new(move |error: ArgusError| {
        tracing::warn!(error = %error, "background error");
        let Some(audit) = &audit else { return };
        let mut context = IndexMap::new();
        context.insert("detail".to_string(), serde_json::json!(error.to_string()));
        if let Err(e) = audit.record(
            Level::Critical,
            "background_error",
            "watcher",
            None,
            None,
            None,
            context,
        ) {
            // Avoid spamming the process log if the audit backend itself
            // is the thing that's failing; note it exactly once.
            let mut logged = last_audit_error_logged.lock();
            if !*logged {
                tracing::error!(error = %e, "audit pipeline failed to record a background error");
                *logged = true;
            }
        }
    })
}

#[cfg(test)]
#[path = "argus_tests.rs"]
mod tests;
