// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded-database backend: a SQLite file opened in WAL journal mode,
//! buffering writes in memory and committing them as a single
//! transaction on flush.

use crate::backend::AuditBackend;
use crate::error::AuditError;
use crate::migration;
use argus_core::AuditEvent;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Rows older than this are evicted during maintenance.
const RETENTION_DAYS: u32 = 90;

/// The backend's operational introspection surface: {total events,
/// events-by-level, events-by-component, oldest/newest timestamps,
/// on-disk size, current schema version}.
#[derive(Debug, Clone, Default)]
pub struct AuditDbStatistics {
    pub total_events: u64,
    pub events_by_level: BTreeMap<String, u64>,
    pub events_by_component: BTreeMap<String, u64>,
    pub oldest_timestamp: Option<String>,
    pub newest_timestamp: Option<String>,
    pub on_disk_size_bytes: u64,
    pub schema_version: u32,
}

pub struct DbBackend {
    conn: Connection,
    path: PathBuf,
    pending: Vec<AuditEvent>,
    buffer_size: usize,
    closed: bool,
}

impl DbBackend {
    pub fn open(path: &Path, buffer_size: usize) -> Result<Self, AuditError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        migration::migrate(&conn)?;
        run_maintenance(&conn);
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            pending: Vec::new(),
            buffer_size: buffer_size.max(1),
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total rows currently stored, for introspection/tests.
    pub fn row_count(&self) -> Result<u64, AuditError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_events", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Runs the retention eviction, optimizer-stats update, and WAL
    /// checkpoint described in §4.4.2. Safe to call periodically in
    /// addition to the one run at [`Self::open`]; failures are logged and
    /// otherwise non-fatal.
    pub fn maintain(&self) {
        run_maintenance(&self.conn);
    }

    /// The backend's statistics surface: totals, per-level and
    /// per-component breakdowns, the oldest/newest event timestamps,
    /// on-disk size, and the currently applied schema version.
    pub fn statistics(&self) -> Result<AuditDbStatistics, AuditError> {
        let total_events: i64 =
            self.conn.query_row("SELECT COUNT(*) FROM audit_events", [], |row| row.get(0))?;

        let mut events_by_level = BTreeMap::new();
        let mut stmt = self.conn.prepare("SELECT level, COUNT(*) FROM audit_events GROUP BY level")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        for row in rows {
            let (level, count) = row?;
            events_by_level.insert(level, count as u64);
        }
        drop(stmt);

        let mut events_by_component = BTreeMap::new();
        let mut stmt =
            self.conn.prepare("SELECT component, COUNT(*) FROM audit_events GROUP BY component")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        for row in rows {
            let (component, count) = row?;
            events_by_component.insert(component, count as u64);
        }
        drop(stmt);

        let oldest_timestamp: Option<String> =
            self.conn.query_row("SELECT MIN(timestamp) FROM audit_events", [], |row| row.get(0))?;
        let newest_timestamp: Option<String> =
            self.conn.query_row("SELECT MAX(timestamp) FROM audit_events", [], |row| row.get(0))?;

        let on_disk_size_bytes = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        let schema_version = migration::recorded_version(&self.conn)?;

        Ok(AuditDbStatistics {
            total_events: total_events as u64,
            events_by_level,
            events_by_component,
            oldest_timestamp,
            newest_timestamp,
            on_disk_size_bytes,
            schema_version,
        })
    }
}

/// Evicts rows past the retention window, refreshes the query planner's
/// statistics, and checkpoints the WAL. Each step is independent — a
/// failure in one doesn't block the others, since maintenance is
/// best-effort upkeep, never load-bearing for correctness.
fn run_maintenance(conn: &Connection) {
    if let Err(e) = conn.execute(
        &format!("DELETE FROM audit_events WHERE created_at < datetime('now', '-{RETENTION_DAYS} days')"),
        [],
    ) {
        tracing::warn!(error = %e, "audit retention eviction failed");
    }
    if let Err(e) = conn.execute_batch("ANALYZE;") {
        tracing::warn!(error = %e, "audit optimizer statistics update failed");
    }
    if let Err(e) = conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);") {
        tracing::warn!(error = %e, "audit WAL checkpoint failed");
    }
}

impl AuditBackend for DbBackend {
    fn write(&mut self, event: &AuditEvent) -> Result<(), AuditError> {
        if self.closed {
            return Err(AuditError::Closed);
        }
        self.pending.push(event.clone());
        if self.pending.len() >= self.buffer_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), AuditError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let output_file = self.path.to_string_lossy().into_owned();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO audit_events
                    (timestamp, level, event, component, original_output_file, file_path, old_value,
                     new_value, process_id, process_name, context, checksum, sequence)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                     (SELECT COALESCE(MAX(sequence), 0) FROM audit_events) + 1)",
            )?;
            for event in self.pending.drain(..) {
                stmt.execute(rusqlite::params![
                    event.timestamp_rfc3339,
                    event.level.as_str(),
                    event.event,
                    event.component,
                    output_file,
                    event.file_path,
                    event.old_value.as_ref().map(|v| v.to_string()),
                    event.new_value.as_ref().map(|v| v.to_string()),
                    event.process_id,
                    event.process_name,
                    serde_json::to_string(&event.context)?,
                    event.checksum,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AuditError> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        if let Err(e) = self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);") {
            tracing::warn!(error = %e, "final WAL checkpoint on close failed");
        }
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "embedded-db"
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
