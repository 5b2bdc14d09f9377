//! Daily call-budget guard
//!
//! Pure planning logic: given the configured cap, the count of calls
//! already ledgered for today, and the windows already covered, decide
//! which page windows this run is still permitted to request. The
//! ledger itself is the single source of truth for "used calls" —
//! callers query it and inject the counts; this module never touches
//! the database or the clock.

use crate::window::{partition_windows, PageWindow};
use crate::IngestError;

/// Outcome of budget planning for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Windows this run may request, in ascending order
    Windows(Vec<PageWindow>),
    /// The daily cap is already met; the run ends cleanly without calling
    Exhausted,
}

/// Computes the set of page windows still permitted for today's run.
///
/// Partitions `[0, total_range)` into windows of `window_size` items,
/// drops any window listed in `done_windows` (windows already ledgered
/// today, under the resume continuation policy), and returns at most
/// `daily_cap - used_today` of the rest, in ascending order.
///
/// # Arguments
///
/// * `daily_cap` - Maximum upstream calls permitted per logical day
/// * `window_size` - Items requested per call
/// * `total_range` - Total item indices to cover, starting from 0
/// * `used_today` - Ledger entry count for today's call date (any status)
/// * `done_windows` - Windows to skip; empty under the restart policy
///
/// # Returns
///
/// * `Ok(Plan::Windows(_))` - At least one window may still be requested
/// * `Ok(Plan::Exhausted)` - No budget remains (or nothing left to cover)
/// * `Err(IngestError::InvalidConfiguration)` - Non-positive cap, window
///   size, or range; nothing has been called yet when this is raised
pub fn plan_windows(
    daily_cap: u32,
    window_size: u32,
    total_range: u32,
    used_today: u32,
    done_windows: &[PageWindow],
) -> Result<Plan, IngestError> {
    if daily_cap == 0 {
        return Err(IngestError::InvalidConfiguration(
            "daily cap must be positive".to_string(),
        ));
    }
    if window_size == 0 {
        return Err(IngestError::InvalidConfiguration(
            "window size must be positive".to_string(),
        ));
    }
    if total_range == 0 {
        return Err(IngestError::InvalidConfiguration(
            "total range must be positive".to_string(),
        ));
    }

    let remaining = daily_cap.saturating_sub(used_today);
    if remaining == 0 {
        return Ok(Plan::Exhausted);
    }

    let windows: Vec<PageWindow> = partition_windows(total_range, window_size)
        .into_iter()
        .filter(|w| !done_windows.contains(w))
        .take(remaining as usize)
        .collect();

    if windows.is_empty() {
        // Budget remains but every window is already covered today.
        return Ok(Plan::Exhausted);
    }

    Ok(Plan::Windows(windows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_range_under_cap() {
        let plan = plan_windows(5, 1000, 4000, 0, &[]).unwrap();
        assert_eq!(
            plan,
            Plan::Windows(vec![
                PageWindow::new(0, 999),
                PageWindow::new(1000, 1999),
                PageWindow::new(2000, 2999),
                PageWindow::new(3000, 3999),
            ])
        );
    }

    #[test]
    fn test_remaining_budget_truncates_plan() {
        let plan = plan_windows(5, 1000, 4000, 4, &[]).unwrap();
        assert_eq!(plan, Plan::Windows(vec![PageWindow::new(0, 999)]));
    }

    #[test]
    fn test_cap_already_met() {
        let plan = plan_windows(5, 1000, 4000, 5, &[]).unwrap();
        assert_eq!(plan, Plan::Exhausted);
    }

    #[test]
    fn test_used_beyond_cap_is_exhausted() {
        let plan = plan_windows(5, 1000, 4000, 9, &[]).unwrap();
        assert_eq!(plan, Plan::Exhausted);
    }

    #[test]
    fn test_never_plans_more_than_remaining() {
        for used in 0..=10u32 {
            let plan = plan_windows(10, 100, 10_000, used, &[]).unwrap();
            match plan {
                Plan::Windows(windows) => {
                    assert!(windows.len() as u32 <= 10 - used);
                }
                Plan::Exhausted => assert!(used >= 10),
            }
        }
    }

    #[test]
    fn test_done_windows_are_skipped() {
        let done = vec![PageWindow::new(0, 999), PageWindow::new(1000, 1999)];
        let plan = plan_windows(5, 1000, 4000, 2, &done).unwrap();
        assert_eq!(
            plan,
            Plan::Windows(vec![
                PageWindow::new(2000, 2999),
                PageWindow::new(3000, 3999),
            ])
        );
    }

    #[test]
    fn test_everything_done_is_exhausted() {
        let done = vec![PageWindow::new(0, 999), PageWindow::new(1000, 1499)];
        let plan = plan_windows(5, 1000, 1500, 2, &done).unwrap();
        assert_eq!(plan, Plan::Exhausted);
    }

    #[test]
    fn test_range_smaller_than_window_yields_one_window() {
        let plan = plan_windows(5, 1000, 300, 0, &[]).unwrap();
        assert_eq!(plan, Plan::Windows(vec![PageWindow::new(0, 299)]));
    }

    #[test]
    fn test_zero_window_size_is_invalid() {
        let result = plan_windows(5, 0, 4000, 0, &[]);
        assert!(matches!(
            result,
            Err(IngestError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_cap_is_invalid() {
        let result = plan_windows(0, 1000, 4000, 0, &[]);
        assert!(matches!(
            result,
            Err(IngestError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_range_is_invalid() {
        let result = plan_windows(5, 1000, 0, 0, &[]);
        assert!(matches!(
            result,
            Err(IngestError::InvalidConfiguration(_))
        ));
    }
}
