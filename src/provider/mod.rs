//! Upstream API provider
//!
//! This module contains the fetch collaborator, including:
//! - Building HTTP clients with bounded timeouts
//! - Requesting one page window per call
//! - Parsing the paginated JSON envelope into flat field mappings
//! - Error classification for budget-safe retry handling

mod client;
mod parse;

pub use client::{build_http_client, HttpProvider};
pub use parse::{parse_response, ParsedResponse};

use crate::canonical::Payload;
use crate::window::PageWindow;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by the fetch collaborator.
///
/// Every variant is recorded in the call ledger as `status = error` and
/// never aborts the run; the failing window stays available for a future
/// run under that run's own budget.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed for window {window}: {source}")]
    Http {
        window: PageWindow,
        source: reqwest::Error,
    },

    #[error("Request timed out for window {window}")]
    Timeout { window: PageWindow },

    #[error("HTTP status {status} for window {window}")]
    Status { window: PageWindow, status: u16 },

    #[error("Upstream API error for window {window}: code={code}, message={message}")]
    Api {
        window: PageWindow,
        code: String,
        message: String,
    },

    #[error("Malformed response body for window {window}: {message}")]
    Parse { window: PageWindow, message: String },
}

/// One successfully fetched page window
#[derive(Debug, Clone)]
pub struct FetchPage {
    pub window: PageWindow,
    /// Total item count reported by the upstream, when present
    pub total_count: Option<u32>,
    /// Parsed rows, one flat field mapping per record
    pub rows: Vec<Payload>,
}

/// The fetch collaborator: requests one inclusive index window per call.
///
/// Pagination semantics (inclusive start/end item indices) are fixed by
/// the upstream API and passed through unchanged. Implementations must
/// bound every call with a timeout.
#[async_trait]
pub trait ArrivalSource {
    async fn fetch(&self, window: PageWindow) -> Result<FetchPage, FetchError>;
}
