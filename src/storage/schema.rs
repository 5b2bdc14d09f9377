//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Railsnap
//! database. Both tables are append-only; uniqueness constraints carry
//! the dedup and idempotence guarantees.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every fetched record, stored losslessly and keyed by content hash
CREATE TABLE IF NOT EXISTS arrivals_raw (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    snapshot_id TEXT NOT NULL,
    collected_at TEXT NOT NULL,
    page_start INTEGER NOT NULL,
    page_end INTEGER NOT NULL,
    raw_payload TEXT NOT NULL,
    payload_hash TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_arrivals_snapshot ON arrivals_raw(snapshot_id);
CREATE INDEX IF NOT EXISTS idx_arrivals_collected ON arrivals_raw(collected_at);
CREATE INDEX IF NOT EXISTS idx_arrivals_window ON arrivals_raw(page_start, page_end);

-- Every attempted upstream call; sole input to budget accounting
CREATE TABLE IF NOT EXISTS call_ledger (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    call_date TEXT NOT NULL,
    snapshot_id TEXT NOT NULL,
    page_start INTEGER NOT NULL,
    page_end INTEGER NOT NULL,
    called_at TEXT NOT NULL,
    status TEXT NOT NULL,
    UNIQUE(snapshot_id, page_start, page_end)
);

CREATE INDEX IF NOT EXISTS idx_ledger_date ON call_ledger(call_date);
CREATE INDEX IF NOT EXISTS idx_ledger_snapshot ON call_ledger(snapshot_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["arrivals_raw", "call_ledger"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_payload_hash_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let insert = "INSERT INTO arrivals_raw
            (snapshot_id, collected_at, page_start, page_end, raw_payload, payload_hash, created_at)
            VALUES ('s1', 't', 0, 999, '{}', 'abc', 't')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn test_ledger_window_is_unique_per_snapshot() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let insert = "INSERT INTO call_ledger
            (call_date, snapshot_id, page_start, page_end, called_at, status)
            VALUES ('2026-08-23', 's1', 0, 999, 't', 'success')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());

        // A different snapshot may ledger the same window
        let other = "INSERT INTO call_ledger
            (call_date, snapshot_id, page_start, page_end, called_at, status)
            VALUES ('2026-08-23', 's2', 0, 999, 't', 'success')";
        conn.execute(other, []).unwrap();
    }
}
