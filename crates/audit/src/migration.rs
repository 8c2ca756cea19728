// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded-database schema migration, chained the same way the in-memory
//! snapshot migrations are: each step knows only its immediate
//! predecessor version, and the registry walks forward to the target.

use crate::error::AuditError;
use rusqlite::Connection;

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Brings a freshly opened connection up to [`CURRENT_SCHEMA_VERSION`],
/// creating the schema from scratch at version 0. The applied version is
/// recorded in `schema_info`, not `PRAGMA user_version` — the latter
/// isn't part of the backend's own introspection surface.
pub fn migrate(conn: &Connection) -> Result<(), AuditError> {
    ensure_schema_info_table(conn)?;
    let mut version = detect_version(conn)?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(AuditError::SchemaTooNew(version, CURRENT_SCHEMA_VERSION));
    }

    if version == 0 {
        create_v1(conn).map_err(|e| migration_failed(0, 1, e))?;
        version = 1;
        record_version(conn, version)?;
    }
    if version == 1 {
        migrate_v1_to_v2(conn).map_err(|e| migration_failed(1, 2, e))?;
        version = 2;
        record_version(conn, version)?;
    }

    Ok(())
}

/// Highest version `schema_info` has a row for. Used by the backend's
/// statistics surface.
pub(crate) fn recorded_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    detect_version(conn)
}

fn ensure_schema_info_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_info (
            version INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
}

/// The highest version recorded in `schema_info`, or — for a database
/// that predates the `schema_info` ledger but already has an
/// `audit_events` table — version 1, so a genuinely external legacy
/// database still migrates forward correctly.
fn detect_version(conn: &Connection) -> Result<u32, rusqlite::Error> {
    let recorded: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_info", [], |row| row.get(0))?;
    if let Some(version) = recorded {
        return Ok(version);
    }
    let has_audit_events: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'audit_events'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)?;
    Ok(if has_audit_events { 1 } else { 0 })
}

fn record_version(conn: &Connection, version: u32) -> Result<(), AuditError> {
    conn.execute(
        "INSERT INTO schema_info (version, created_at, updated_at)
         VALUES (?1, datetime('now'), datetime('now'))
         ON CONFLICT(version) DO UPDATE SET updated_at = excluded.updated_at",
        rusqlite::params![version],
    )?;
    Ok(())
}

/// v1: `audit_events` plus its five single-column indexes (timestamp,
/// level, component, source file, creation time).
fn create_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS audit_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            level TEXT NOT NULL,
            event TEXT NOT NULL,
            component TEXT NOT NULL,
            original_output_file TEXT NOT NULL,
            file_path TEXT,
            old_value TEXT,
            new_value TEXT,
            process_id INTEGER NOT NULL,
            process_name TEXT NOT NULL,
            context TEXT,
            checksum TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_audit_events_timestamp ON audit_events(timestamp);
        CREATE INDEX IF NOT EXISTS idx_audit_events_level ON audit_events(level);
        CREATE INDEX IF NOT EXISTS idx_audit_events_component ON audit_events(component);
        CREATE INDEX IF NOT EXISTS idx_audit_events_file_path ON audit_events(file_path);
        CREATE INDEX IF NOT EXISTS idx_audit_events_created_at ON audit_events(created_at);",
    )
}

/// v2 adds an explicit monotonic `sequence` column (backfilled from
/// `rowid`) and the four composite indexes tuned for the common queries
/// (component+time, level+creation-time, source+component,
/// event+component+time). Column backfills are guarded so this also
/// upgrades an externally created v1 database that predates this crate's
/// `original_output_file`/`created_at` columns.
fn migrate_v1_to_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    if !column_exists(conn, "original_output_file")? {
        conn.execute_batch(
            "ALTER TABLE audit_events ADD COLUMN original_output_file TEXT NOT NULL DEFAULT '';",
        )?;
    }
    if !column_exists(conn, "created_at")? {
        conn.execute_batch(
            "ALTER TABLE audit_events ADD COLUMN created_at TEXT NOT NULL DEFAULT (datetime('now'));",
        )?;
    }
    if !column_exists(conn, "sequence")? {
        conn.execute_batch(
            "ALTER TABLE audit_events ADD COLUMN sequence INTEGER NOT NULL DEFAULT 0;
             UPDATE audit_events SET sequence = id;",
        )?;
    }
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_audit_events_timestamp ON audit_events(timestamp);
         CREATE INDEX IF NOT EXISTS idx_audit_events_level ON audit_events(level);
         CREATE INDEX IF NOT EXISTS idx_audit_events_component ON audit_events(component);
         CREATE INDEX IF NOT EXISTS idx_audit_events_file_path ON audit_events(file_path);
         CREATE INDEX IF NOT EXISTS idx_audit_events_created_at ON audit_events(created_at);
         CREATE INDEX IF NOT EXISTS idx_audit_events_component_time ON audit_events(component, timestamp);
         CREATE INDEX IF NOT EXISTS idx_audit_events_level_created_at ON audit_events(level, created_at);
         CREATE INDEX IF NOT EXISTS idx_audit_events_file_path_component ON audit_events(file_path, component);
         CREATE INDEX IF NOT EXISTS idx_audit_events_event_component_time ON audit_events(event, component, timestamp);",
    )
}

fn column_exists(conn: &Connection, column: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM pragma_table_info('audit_events') WHERE name = '{column}'"),
        [],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
}

fn migration_failed(from: u32, to: u32, source: rusqlite::Error) -> AuditError {
    AuditError::Migration {
        from,
        to,
        reason: source.to_string(),
    }
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
