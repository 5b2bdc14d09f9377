//! Ingestion runner: one-shot snapshot orchestration
//!
//! One run derives a fresh snapshot id, asks the budget guard which
//! windows are still allowed today, then walks them in order: fetch,
//! canonicalize, write to the raw store, ledger the call. A failed
//! window is ledgered as an error and never retried within the run;
//! the ledger write is what keeps a failing window from burning budget
//! without bound across retriggered runs.

use crate::budget::{plan_windows, Plan};
use crate::canonical::{canonical_form, payload_hash};
use crate::config::{BudgetConfig, Continuation};
use crate::provider::ArrivalSource;
use crate::storage::{CallStatus, InsertOutcome, Storage};
use crate::window::PageWindow;
use crate::IngestError;
use chrono::DateTime;
use chrono_tz::Tz;

/// Terminal status of one ingestion run.
///
/// Each status maps to a distinct process exit code so an external
/// scheduler can tell the outcomes apart without parsing logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every allotted window was fetched and stored
    Complete,
    /// At least one window errored; completed windows stay committed
    PartialFailure,
    /// The daily cap was already met; nothing was called
    Exhausted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::PartialFailure => "partial-failure",
            Self::Exhausted => "exhausted",
        }
    }

    /// Exit code for automated callers (0 complete, 2 exhausted, 3 partial)
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Complete => 0,
            Self::Exhausted => 2,
            Self::PartialFailure => 3,
        }
    }
}

/// Per-window outcome within one run
#[derive(Debug, Clone)]
pub struct WindowReport {
    pub window: PageWindow,
    pub status: CallStatus,
    pub rows_fetched: u64,
    pub rows_stored: u64,
    pub rows_deduplicated: u64,
    pub error: Option<String>,
}

/// Summary of one ingestion run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub snapshot_id: String,
    pub status: RunStatus,
    pub windows_planned: usize,
    pub windows_attempted: usize,
    pub windows_failed: usize,
    pub rows_fetched: u64,
    pub rows_stored: u64,
    pub rows_deduplicated: u64,
    pub windows: Vec<WindowReport>,
}

/// Executes one ingestion run.
///
/// The clock is injected so the logical call date, the snapshot id, and
/// every ledger timestamp are reckoned in the configured operating
/// timezone and stay testable.
///
/// # Arguments
///
/// * `budget` - Daily cap, window size, total range, continuation policy
/// * `storage` - The raw store and call ledger
/// * `provider` - The fetch collaborator
/// * `clock` - Returns the current time in the operating timezone
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run reached a terminal state (including
///   `Exhausted` and `PartialFailure`; neither is an error)
/// * `Err(IngestError)` - Invalid budget parameters or a storage failure
pub async fn run_snapshot<S, P, C>(
    budget: &BudgetConfig,
    storage: &mut S,
    provider: &P,
    clock: C,
) -> Result<RunSummary, IngestError>
where
    S: Storage,
    P: ArrivalSource + ?Sized,
    C: Fn() -> DateTime<Tz>,
{
    let started = clock();
    let call_date = started.date_naive();
    let snapshot_id = started.format("%Y%m%d_%H%M%S").to_string();
    let collected_at = started.to_rfc3339();

    // The ledger is the sole source of truth for today's usage; the
    // budget check is evaluated once, up front, against that count.
    let used_today = storage.used_calls(call_date)?;
    let done_windows = match budget.continuation {
        Continuation::Resume => storage.called_windows(call_date)?,
        Continuation::Restart => Vec::new(),
    };

    let plan = plan_windows(
        budget.daily_cap,
        budget.window_size,
        budget.total_range,
        used_today,
        &done_windows,
    )?;

    let planned = match plan {
        Plan::Exhausted => {
            tracing::info!(
                snapshot_id = %snapshot_id,
                used_today,
                daily_cap = budget.daily_cap,
                "Daily call budget exhausted; ending run cleanly"
            );
            return Ok(RunSummary {
                snapshot_id,
                status: RunStatus::Exhausted,
                windows_planned: 0,
                windows_attempted: 0,
                windows_failed: 0,
                rows_fetched: 0,
                rows_stored: 0,
                rows_deduplicated: 0,
                windows: Vec::new(),
            });
        }
        Plan::Windows(windows) => windows,
    };

    tracing::info!(
        snapshot_id = %snapshot_id,
        windows = planned.len(),
        used_today,
        daily_cap = budget.daily_cap,
        "Starting ingestion run"
    );

    let mut reports = Vec::with_capacity(planned.len());

    for window in &planned {
        let report = match provider.fetch(*window).await {
            Ok(page) => {
                let mut stored = 0u64;
                let mut deduplicated = 0u64;

                for row in &page.rows {
                    let hash = payload_hash(row);
                    let raw = canonical_form(row);
                    match storage.insert_raw(&snapshot_id, &collected_at, *window, &raw, &hash)? {
                        InsertOutcome::Stored => stored += 1,
                        InsertOutcome::Deduplicated => deduplicated += 1,
                    }
                }

                let called_at = clock().to_rfc3339();
                storage.record_call(
                    call_date,
                    &snapshot_id,
                    *window,
                    &called_at,
                    CallStatus::Success,
                )?;

                tracing::debug!(
                    window = %window,
                    rows = page.rows.len(),
                    stored,
                    deduplicated,
                    "Window ingested"
                );

                WindowReport {
                    window: *window,
                    status: CallStatus::Success,
                    rows_fetched: page.rows.len() as u64,
                    rows_stored: stored,
                    rows_deduplicated: deduplicated,
                    error: None,
                }
            }
            Err(e) => {
                // The failed attempt still consumed one upstream call, so
                // it is ledgered before moving on.
                tracing::warn!(window = %window, error = %e, "Window fetch failed");

                let called_at = clock().to_rfc3339();
                storage.record_call(
                    call_date,
                    &snapshot_id,
                    *window,
                    &called_at,
                    CallStatus::Error,
                )?;

                WindowReport {
                    window: *window,
                    status: CallStatus::Error,
                    rows_fetched: 0,
                    rows_stored: 0,
                    rows_deduplicated: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        reports.push(report);
    }

    let windows_failed = reports
        .iter()
        .filter(|r| r.status == CallStatus::Error)
        .count();
    let rows_fetched: u64 = reports.iter().map(|r| r.rows_fetched).sum();
    let rows_stored: u64 = reports.iter().map(|r| r.rows_stored).sum();
    let rows_deduplicated: u64 = reports.iter().map(|r| r.rows_deduplicated).sum();

    let status = if windows_failed == 0 {
        RunStatus::Complete
    } else {
        RunStatus::PartialFailure
    };

    tracing::info!(
        snapshot_id = %snapshot_id,
        status = status.as_str(),
        windows_attempted = reports.len(),
        windows_failed,
        rows_fetched,
        rows_stored,
        rows_deduplicated,
        "Ingestion run finished"
    );

    Ok(RunSummary {
        snapshot_id,
        status,
        windows_planned: planned.len(),
        windows_attempted: reports.len(),
        windows_failed,
        rows_fetched,
        rows_stored,
        rows_deduplicated,
        windows: reports,
    })
}
