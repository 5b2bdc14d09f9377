//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! Conditional inserts (`INSERT OR IGNORE`) let the database enforce the
//! content-hash and ledger uniqueness invariants atomically.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{CallStatus, InsertOutcome, LedgerEntry, RawRecord, RecordOutcome};
use crate::window::PageWindow;
use crate::IngestError;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IngestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, IngestError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, IngestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn format_call_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl Storage for SqliteStorage {
    // ===== Raw Store =====

    fn insert_raw(
        &mut self,
        snapshot_id: &str,
        collected_at: &str,
        window: PageWindow,
        raw_payload: &str,
        payload_hash: &str,
    ) -> StorageResult<InsertOutcome> {
        let created_at = Utc::now().to_rfc3339();
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO arrivals_raw
             (snapshot_id, collected_at, page_start, page_end, raw_payload, payload_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                snapshot_id,
                collected_at,
                window.start,
                window.end,
                raw_payload,
                payload_hash,
                created_at
            ],
        )?;

        if changed == 0 {
            Ok(InsertOutcome::Deduplicated)
        } else {
            Ok(InsertOutcome::Stored)
        }
    }

    fn get_raw_by_hash(&self, payload_hash: &str) -> StorageResult<Option<RawRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, snapshot_id, collected_at, page_start, page_end,
                    raw_payload, payload_hash, created_at
             FROM arrivals_raw WHERE payload_hash = ?1",
        )?;

        let record = stmt
            .query_row(params![payload_hash], |row| {
                Ok(RawRecord {
                    id: row.get(0)?,
                    snapshot_id: row.get(1)?,
                    collected_at: row.get(2)?,
                    window: PageWindow::new(row.get(3)?, row.get(4)?),
                    raw_payload: row.get(5)?,
                    payload_hash: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .optional()?;

        Ok(record)
    }

    fn count_raw_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM arrivals_raw", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_raw_for_snapshot(&self, snapshot_id: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM arrivals_raw WHERE snapshot_id = ?1",
            params![snapshot_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_snapshots(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT snapshot_id) FROM arrivals_raw",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn latest_snapshot_id(&self) -> StorageResult<Option<String>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT snapshot_id FROM arrivals_raw ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(snapshot)
    }

    // ===== Call Ledger =====

    fn record_call(
        &mut self,
        call_date: NaiveDate,
        snapshot_id: &str,
        window: PageWindow,
        called_at: &str,
        status: CallStatus,
    ) -> StorageResult<RecordOutcome> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO call_ledger
             (call_date, snapshot_id, page_start, page_end, called_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_call_date(call_date),
                snapshot_id,
                window.start,
                window.end,
                called_at,
                status.to_db_string()
            ],
        )?;

        if changed == 0 {
            Ok(RecordOutcome::AlreadyRecorded)
        } else {
            Ok(RecordOutcome::Recorded)
        }
    }

    fn used_calls(&self, call_date: NaiveDate) -> StorageResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM call_ledger WHERE call_date = ?1",
            params![format_call_date(call_date)],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    fn called_windows(&self, call_date: NaiveDate) -> StorageResult<Vec<PageWindow>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT page_start, page_end FROM call_ledger
             WHERE call_date = ?1 ORDER BY page_start",
        )?;

        let windows = stmt
            .query_map(params![format_call_date(call_date)], |row| {
                Ok(PageWindow::new(row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(windows)
    }

    fn ledger_for_snapshot(&self, snapshot_id: &str) -> StorageResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT call_date, snapshot_id, page_start, page_end, called_at, status
             FROM call_ledger WHERE snapshot_id = ?1 ORDER BY id",
        )?;

        let entries = stmt
            .query_map(params![snapshot_id], |row| {
                Ok(LedgerEntry {
                    call_date: row.get(0)?,
                    snapshot_id: row.get(1)?,
                    window: PageWindow::new(row.get(2)?, row.get(3)?),
                    called_at: row.get(4)?,
                    status: CallStatus::from_db_string(&row.get::<_, String>(5)?)
                        .unwrap_or(CallStatus::Error),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
