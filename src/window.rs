//! Page windows: contiguous ranges of item indices requested from the
//! upstream API in one call.

use std::fmt;

/// An inclusive range of item indices covered by a single API call.
///
/// The upstream API paginates by inclusive start/end item indices, so a
/// window of size 1000 starting at 0 is `[0, 999]`. Those semantics are
/// fixed by the provider and passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageWindow {
    /// First item index, inclusive
    pub start: u32,
    /// Last item index, inclusive
    pub end: u32,
}

impl PageWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Partitions `total_range` items into consecutive, non-overlapping windows
/// of `window_size` items each. The last window may be shorter.
///
/// Callers are expected to have validated both arguments as positive; a
/// zero `window_size` or `total_range` yields an empty partition rather
/// than panicking.
pub fn partition_windows(total_range: u32, window_size: u32) -> Vec<PageWindow> {
    if window_size == 0 || total_range == 0 {
        return Vec::new();
    }

    let mut windows = Vec::new();
    let mut start = 0u32;
    while start < total_range {
        let end = start.saturating_add(window_size - 1).min(total_range - 1);
        windows.push(PageWindow::new(start, end));
        start = end + 1;
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_exact_multiple() {
        let windows = partition_windows(4000, 1000);
        assert_eq!(
            windows,
            vec![
                PageWindow::new(0, 999),
                PageWindow::new(1000, 1999),
                PageWindow::new(2000, 2999),
                PageWindow::new(3000, 3999),
            ]
        );
    }

    #[test]
    fn test_partition_short_last_window() {
        let windows = partition_windows(2500, 1000);
        assert_eq!(
            windows,
            vec![
                PageWindow::new(0, 999),
                PageWindow::new(1000, 1999),
                PageWindow::new(2000, 2499),
            ]
        );
    }

    #[test]
    fn test_partition_range_smaller_than_window() {
        let windows = partition_windows(300, 1000);
        assert_eq!(windows, vec![PageWindow::new(0, 299)]);
    }

    #[test]
    fn test_partition_single_item() {
        let windows = partition_windows(1, 1000);
        assert_eq!(windows, vec![PageWindow::new(0, 0)]);
    }

    #[test]
    fn test_partition_zero_inputs() {
        assert!(partition_windows(0, 1000).is_empty());
        assert!(partition_windows(1000, 0).is_empty());
    }

    #[test]
    fn test_windows_are_contiguous() {
        let windows = partition_windows(5432, 700);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end + 1, pair[1].start);
        }
        assert_eq!(windows.last().unwrap().end, 5431);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(PageWindow::new(0, 999).to_string(), "[0, 999]");
    }
}
