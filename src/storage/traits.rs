//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{CallStatus, InsertOutcome, LedgerEntry, RawRecord, RecordOutcome};
use crate::window::PageWindow;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Both tables this trait fronts are append-only: raw records and ledger
/// entries are inserted once and never updated or deleted. Uniqueness is
/// enforced by the backend itself so concurrent runs inserting the same
/// content or retrying the same window stay correct without application
/// locking.
pub trait Storage {
    // ===== Raw Store =====

    /// Inserts one raw record, keyed by content hash.
    ///
    /// Returns `InsertOutcome::Deduplicated` without error when a record
    /// with the same `payload_hash` already exists, regardless of which
    /// run stored it. The insert is atomic in the backend; there is no
    /// check-then-insert race.
    fn insert_raw(
        &mut self,
        snapshot_id: &str,
        collected_at: &str,
        window: PageWindow,
        raw_payload: &str,
        payload_hash: &str,
    ) -> StorageResult<InsertOutcome>;

    /// Gets a raw record by its content hash
    fn get_raw_by_hash(&self, payload_hash: &str) -> StorageResult<Option<RawRecord>>;

    /// Counts all raw records ever stored
    fn count_raw_records(&self) -> StorageResult<u64>;

    /// Counts raw records produced by one snapshot
    fn count_raw_for_snapshot(&self, snapshot_id: &str) -> StorageResult<u64>;

    /// Counts distinct snapshot ids present in the raw store
    fn count_snapshots(&self) -> StorageResult<u64>;

    /// Gets the most recent snapshot id in the raw store, if any
    fn latest_snapshot_id(&self) -> StorageResult<Option<String>>;

    // ===== Call Ledger =====

    /// Appends one ledger entry for an attempted upstream call.
    ///
    /// Returns `RecordOutcome::AlreadyRecorded` when an entry for the same
    /// `(snapshot_id, window)` already exists — a retry of the identical
    /// window within one run must not double-count against budget.
    fn record_call(
        &mut self,
        call_date: NaiveDate,
        snapshot_id: &str,
        window: PageWindow,
        called_at: &str,
        status: CallStatus,
    ) -> StorageResult<RecordOutcome>;

    /// Counts ledger entries for one call date, success and error alike.
    ///
    /// An errored attempt still consumed one call against the upstream
    /// provider, so both statuses count toward the daily cap.
    fn used_calls(&self, call_date: NaiveDate) -> StorageResult<u32>;

    /// Gets the distinct windows already ledgered for one call date,
    /// in ascending order
    fn called_windows(&self, call_date: NaiveDate) -> StorageResult<Vec<PageWindow>>;

    /// Gets all ledger entries for one snapshot, in insertion order
    fn ledger_for_snapshot(&self, snapshot_id: &str) -> StorageResult<Vec<LedgerEntry>>;
}
