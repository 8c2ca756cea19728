// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario 5: schema migration.

use argus_audit::{CURRENT_SCHEMA_VERSION, DbBackend};
use rusqlite::Connection;

fn seed_v1_database(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE audit_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            level TEXT NOT NULL,
            event TEXT NOT NULL,
            component TEXT NOT NULL,
            file_path TEXT,
            old_value TEXT,
            new_value TEXT,
            process_id INTEGER NOT NULL,
            process_name TEXT NOT NULL,
            context TEXT NOT NULL,
            checksum TEXT NOT NULL
        );
        INSERT INTO audit_events
            (timestamp, level, event, component, process_id, process_name, context, checksum)
            VALUES ('2020-01-01T00:00:00Z', 'info', 'legacy', 'legacy-component', 1, 'legacy', '{}', 'deadbeef');",
    )
    .unwrap();
}

#[test]
fn opening_a_legacy_v1_database_migrates_it_to_v2_without_losing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    seed_v1_database(&path);

    let backend = DbBackend::open(&path, 1).unwrap();
    assert_eq!(backend.row_count().unwrap(), 1);

    let conn = Connection::open(&path).unwrap();
    let version: u32 =
        conn.query_row("SELECT MAX(version) FROM schema_info", [], |row| row.get(0)).unwrap();
    assert_eq!(version, CURRENT_SCHEMA_VERSION, "schema_info must report the current version");

    let sequence: i64 =
        conn.query_row("SELECT sequence FROM audit_events WHERE id = 1", [], |row| row.get(0)).unwrap();
    assert_eq!(sequence, 1, "v2's sequence column must be backfilled from the legacy row's id");

    let v2_indexes = [
        "idx_audit_events_component_time",
        "idx_audit_events_level_created_at",
        "idx_audit_events_file_path_component",
        "idx_audit_events_event_component_time",
    ];
    for name in v2_indexes {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        assert!(count > 0, "missing v2 composite index {name}");
    }
}

#[test]
fn migrating_an_already_current_database_a_second_time_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("already-current.db");
    seed_v1_database(&path);

    DbBackend::open(&path, 1).unwrap();
    let backend_again = DbBackend::open(&path, 1).unwrap();
    assert_eq!(backend_again.row_count().unwrap(), 1);
}
