//! Date windows and the batching of long ranges into API-sized windows.
//!
//! The reporting API refuses ranges longer than
//! [`MAX_TRANSACTION_LOOKUP_DAYS`]. [`DateWindow::batches`] walks a range in
//! consecutive sub-windows of at most that span. Neighbouring windows share
//! their boundary instant, so records stamped exactly on a boundary can be
//! returned twice and must be deduplicated by the caller.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use std::fmt;

use crate::{Error, Result};

/// Maximum number of days the reporting API accepts in a single request.
pub const MAX_TRANSACTION_LOOKUP_DAYS: i64 = 31;

/// [`MAX_TRANSACTION_LOOKUP_DAYS`] as a [`Duration`].
pub fn max_transaction_lookup_span() -> Duration {
    Duration::days(MAX_TRANSACTION_LOOKUP_DAYS)
}

/// A closed time range `[start, end]` with `start <= end`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use paypal_reporting::DateWindow;
///
/// let window = DateWindow::new(
///     Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
/// )?;
///
/// let batches: Vec<_> = window.batches(chrono::Duration::days(31))?.collect();
/// assert_eq!(batches.len(), 3);
/// # Ok::<(), paypal_reporting::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    /// Create a window, rejecting an end that lies before the start.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start of the window (inclusive).
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (inclusive).
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The window with both bounds truncated to whole seconds, the
    /// precision of the API's timestamps.
    pub fn whole_seconds(&self) -> Self {
        Self {
            start: self.start.trunc_subsecs(0),
            end: self.end.trunc_subsecs(0),
        }
    }

    /// Length of the window.
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Split the window into consecutive sub-windows no longer than
    /// `max_span`.
    ///
    /// The first sub-window starts at `start`, each following one starts at
    /// the previous end, and the last one is clipped to `end`. A zero-length
    /// window yields exactly one sub-window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `max_span` is not positive.
    pub fn batches(&self, max_span: Duration) -> Result<Batches> {
        if max_span <= Duration::zero() {
            return Err(Error::InvalidInput(format!(
                "Lookup span must be positive, got {}",
                max_span
            )));
        }

        Ok(Batches {
            next_start: Some(self.start),
            end: self.end,
            max_span,
        })
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}

/// Timestamp format accepted by the reporting API.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Iterator over the sub-windows of a [`DateWindow`].
///
/// Created by [`DateWindow::batches`].
#[derive(Debug, Clone)]
pub struct Batches {
    next_start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    max_span: Duration,
}

impl Iterator for Batches {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        let start = self.next_start?;

        // Past the representable range the candidate can only be later than `end`.
        let batch_end = start
            .checked_add_signed(self.max_span)
            .map_or(self.end, |candidate| candidate.min(self.end));

        self.next_start = if batch_end == self.end {
            None
        } else {
            Some(batch_end)
        };

        Some(DateWindow {
            start,
            end: batch_end,
        })
    }
}

impl std::iter::FusedIterator for Batches {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn batches(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateWindow> {
        DateWindow::new(start, end)
            .unwrap()
            .batches(max_transaction_lookup_span())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = DateWindow::new(ymd(2024, 3, 1), ymd(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_zero_length_window_yields_one_batch() {
        let t = ymd(2024, 1, 1);
        let windows = batches(t, t);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start(), t);
        assert_eq!(windows[0].end(), t);
    }

    #[test]
    fn test_exact_span_yields_one_batch() {
        let windows = batches(ymd(2024, 1, 1), ymd(2024, 2, 1));
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end(), ymd(2024, 2, 1));
    }

    #[test]
    fn test_quarter_splits_on_31_day_boundaries() {
        // 74 days: two full 31-day windows and a clipped 12-day tail.
        let windows = batches(ymd(2024, 1, 1), ymd(2024, 3, 15));
        assert_eq!(
            windows,
            vec![
                DateWindow::new(ymd(2024, 1, 1), ymd(2024, 2, 1)).unwrap(),
                DateWindow::new(ymd(2024, 2, 1), ymd(2024, 3, 3)).unwrap(),
                DateWindow::new(ymd(2024, 3, 3), ymd(2024, 3, 15)).unwrap(),
            ]
        );
    }

    #[test]
    fn test_batch_count_is_ceiling_of_span() {
        let start = ymd(2023, 1, 1);
        let span = max_transaction_lookup_span();
        for days in [1_i64, 30, 31, 32, 62, 63, 365, 366] {
            let end = start + Duration::days(days);
            let windows = batches(start, end);
            let expected = (days + MAX_TRANSACTION_LOOKUP_DAYS - 1) / MAX_TRANSACTION_LOOKUP_DAYS;
            assert_eq!(windows.len() as i64, expected, "span of {} days", days);

            // Windows chain without gaps and never exceed the span.
            assert_eq!(windows.first().unwrap().start(), start);
            assert_eq!(windows.last().unwrap().end(), end);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start());
            }
            assert!(windows.iter().all(|w| w.span() <= span));
        }
    }

    #[test]
    fn test_whole_seconds_drops_sub_second_tail() {
        let start = ymd(2024, 1, 1) + Duration::milliseconds(250);
        let end = start + max_transaction_lookup_span() + Duration::milliseconds(500);
        let window = DateWindow::new(start, end).unwrap();

        // Untruncated, the half-second overshoot becomes a second window
        // that would format as `[02-01T00:00:00Z, 02-01T00:00:00Z]`.
        assert_eq!(window.batches(max_transaction_lookup_span()).unwrap().count(), 2);

        let windows: Vec<_> = window
            .whole_seconds()
            .batches(max_transaction_lookup_span())
            .unwrap()
            .collect();
        assert_eq!(
            windows,
            vec![DateWindow::new(ymd(2024, 1, 1), ymd(2024, 2, 1)).unwrap()]
        );
    }

    #[test]
    fn test_whole_seconds_keeps_one_second_tail() {
        let end = ymd(2024, 2, 1) + Duration::milliseconds(1_700);
        let window = DateWindow::new(ymd(2024, 1, 1), end).unwrap().whole_seconds();
        let windows: Vec<_> = window.batches(max_transaction_lookup_span()).unwrap().collect();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].start(), ymd(2024, 2, 1));
        assert_eq!(windows[1].end(), ymd(2024, 2, 1) + Duration::seconds(1));
    }

    #[test]
    fn test_non_positive_span_rejected() {
        let window = DateWindow::new(ymd(2024, 1, 1), ymd(2024, 2, 1)).unwrap();
        assert!(matches!(
            window.batches(Duration::zero()),
            Err(Error::InvalidInput(_))
        ));
        assert!(window.batches(Duration::days(-1)).is_err());
    }

    #[test]
    fn test_display_uses_utc_rfc3339() {
        let window = DateWindow::new(ymd(2024, 1, 1), ymd(2024, 2, 1)).unwrap();
        assert_eq!(
            window.to_string(),
            "[2024-01-01T00:00:00Z, 2024-02-01T00:00:00Z]"
        );
    }
}
