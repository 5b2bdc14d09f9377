//! Storage module for the raw store and the call ledger
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Append-only raw record storage with content-hash dedup
//! - Append-only call-ledger writes and budget queries

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::window::PageWindow;
use crate::IngestError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(IngestError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, IngestError> {
    SqliteStorage::new(path)
}

/// Outcome of a raw-record insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was stored
    Stored,
    /// A row with the same content hash already existed; nothing was written
    Deduplicated,
}

/// Outcome of a ledger write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new ledger entry was appended
    Recorded,
    /// An entry for this (snapshot, window) already existed; nothing was written
    AlreadyRecorded,
}

/// Represents one raw record in the database
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub id: i64,
    pub snapshot_id: String,
    pub collected_at: String,
    pub window: PageWindow,
    pub raw_payload: String,
    pub payload_hash: String,
    pub created_at: String,
}

/// Represents one call-ledger entry
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub call_date: String,
    pub snapshot_id: String,
    pub window: PageWindow,
    pub called_at: String,
    pub status: CallStatus,
}

/// Outcome classification of one upstream call attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    Error,
}

impl CallStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}
