use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Working-hours window must start before it ends: {start} >= {end}")]
    EmptyWindow { start: NaiveTime, end: NaiveTime },

    #[error("Invalid hour for working-hours window: {0}")]
    InvalidHour(u32),
}

/// Daily working-hours window, applied identically to every calendar day.
///
/// Immutable once built; `new` rejects windows where the start does not
/// precede the end, so every constructed window has positive length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl DailyWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::EmptyWindow { start, end });
        }
        Ok(DailyWindow { start, end })
    }

    /// Build a window from whole-hour bounds (e.g. 9 and 17 for 09:00-17:00).
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Result<Self, WindowError> {
        let start = NaiveTime::from_hms_opt(start_hour, 0, 0)
            .ok_or(WindowError::InvalidHour(start_hour))?;
        let end = NaiveTime::from_hms_opt(end_hour, 0, 0)
            .ok_or(WindowError::InvalidHour(end_hour))?;
        Self::new(start, end)
    }

    /// Window length in fractional hours.
    pub fn length_hours(&self) -> f64 {
        hours_between(self.start, self.end).max(0.0)
    }
}

impl std::fmt::Display for DailyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

fn hours_between(start: NaiveTime, end: NaiveTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

/// Hours of overlap between `[start, end]` and the window on a single
/// calendar day.
///
/// Clamps the interval against the day's window open/close instants and
/// floors at zero, so an interval entirely before the window opens or
/// after it closes contributes nothing. Fractional hours are preserved.
pub fn window_overlap(
    day: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
    window: &DailyWindow,
) -> f64 {
    let opens = day.and_time(window.start);
    let closes = day.and_time(window.end);

    let effective_start = start.max(opens);
    let effective_end = end.min(closes);

    ((effective_end - effective_start).num_milliseconds() as f64 / 3_600_000.0).max(0.0)
}

/// Total working hours between two instants, counting only time inside
/// the daily window, summed across every calendar day the interval spans.
///
/// `end < start` is treated as zero elapsed time, never a negative
/// result. Known limitation: every calendar day in range is counted, so
/// an interval spanning a weekend accrues full window hours for Saturday
/// and Sunday as if they were working days.
pub fn working_hours(start: DateTime<Utc>, end: DateTime<Utc>, window: &DailyWindow) -> f64 {
    if end < start {
        return 0.0;
    }

    let start = start.naive_utc();
    let end = end.naive_utc();

    let mut total = 0.0;
    let mut day = start.date();
    while day <= end.date() {
        total += window_overlap(day, start, end, window);
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_to_five() -> DailyWindow {
        DailyWindow::from_hours(9, 17).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_rejects_empty_window() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert!(DailyWindow::new(nine, nine).is_err());
        assert!(DailyWindow::from_hours(17, 9).is_err());
        assert!(DailyWindow::from_hours(9, 25).is_err());
    }

    #[test]
    fn test_window_length() {
        assert_eq!(nine_to_five().length_hours(), 8.0);
        assert_eq!(DailyWindow::from_hours(7, 20).unwrap().length_hours(), 13.0);
    }

    #[test]
    fn test_overlap_inside_window() {
        // Interval fully inside the window: exact difference.
        let day = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        let start = day.and_hms_opt(10, 0, 0).unwrap();
        let end = day.and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &nine_to_five()), 4.5);
    }

    #[test]
    fn test_overlap_outside_window_is_zero() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        let window = nine_to_five();

        // Entirely before the window opens.
        let start = day.and_hms_opt(6, 0, 0).unwrap();
        let end = day.and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &window), 0.0);

        // Entirely after the window closes.
        let start = day.and_hms_opt(18, 0, 0).unwrap();
        let end = day.and_hms_opt(22, 0, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &window), 0.0);
    }

    #[test]
    fn test_overlap_spanning_window_is_full_length() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        let start = day.and_hms_opt(0, 0, 0).unwrap();
        let end = day.and_hms_opt(23, 59, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &nine_to_five()), 8.0);
    }

    #[test]
    fn test_overlap_partial_edges() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        let window = nine_to_five();

        // Starts before open, ends mid-window.
        let start = day.and_hms_opt(7, 0, 0).unwrap();
        let end = day.and_hms_opt(11, 0, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &window), 2.0);

        // Starts mid-window, ends after close.
        let start = day.and_hms_opt(16, 0, 0).unwrap();
        let end = day.and_hms_opt(20, 0, 0).unwrap();
        assert_eq!(window_overlap(day, start, end, &window), 1.0);
    }

    #[test]
    fn test_same_day_within_window() {
        // Scenario A: Monday 10:00 to Monday 14:00, window 09:00-17:00.
        let window = nine_to_five();
        let s = utc(2023, 6, 5, 10, 0);
        let e = utc(2023, 6, 5, 14, 0);
        assert_eq!(working_hours(s, e, &window), 4.0);
    }

    #[test]
    fn test_overnight_split() {
        // Scenario B: Monday 16:00 to Tuesday 10:00 = 1h Monday + 1h Tuesday.
        let window = nine_to_five();
        let s = utc(2023, 6, 5, 16, 0);
        let e = utc(2023, 6, 6, 10, 0);
        assert_eq!(working_hours(s, e, &window), 2.0);
    }

    #[test]
    fn test_multi_day_with_full_interior_day() {
        // Scenario C: Monday 08:00 to Wednesday 18:00 = 8 + 8 + 8.
        let window = nine_to_five();
        let s = utc(2023, 6, 5, 8, 0);
        let e = utc(2023, 6, 7, 18, 0);
        assert_eq!(working_hours(s, e, &window), 24.0);
    }

    #[test]
    fn test_zero_length_interval() {
        // Scenario D: s == e yields 0, wherever the instant falls.
        let window = nine_to_five();
        let noon = utc(2023, 6, 5, 12, 0);
        assert_eq!(working_hours(noon, noon, &window), 0.0);
        let midnight = utc(2023, 6, 5, 0, 0);
        assert_eq!(working_hours(midnight, midnight, &window), 0.0);
    }

    #[test]
    fn test_end_before_start_clamps_to_zero() {
        let window = nine_to_five();
        let s = utc(2023, 6, 7, 12, 0);
        let e = utc(2023, 6, 5, 12, 0);
        assert_eq!(working_hours(s, e, &window), 0.0);
    }

    #[test]
    fn test_weekend_days_count_in_full() {
        // Friday 2023-06-09 16:00 to Monday 2023-06-12 10:00.
        // Saturday and Sunday each contribute a full 8h window.
        let window = nine_to_five();
        let s = utc(2023, 6, 9, 16, 0);
        let e = utc(2023, 6, 12, 10, 0);
        assert_eq!(working_hours(s, e, &window), 1.0 + 8.0 + 8.0 + 1.0);
    }

    #[test]
    fn test_fractional_hours_preserved() {
        let window = nine_to_five();
        let s = Utc.with_ymd_and_hms(2023, 6, 5, 10, 15, 30).unwrap();
        let e = Utc.with_ymd_and_hms(2023, 6, 5, 10, 45, 30).unwrap();
        assert_eq!(working_hours(s, e, &window), 0.5);
    }

    #[test]
    fn test_monotonic_in_end_instant() {
        let window = nine_to_five();
        let s = utc(2023, 6, 5, 10, 0);
        let mut previous = 0.0;
        for hour_offset in 0..72 {
            let e = s + chrono::Duration::hours(hour_offset);
            let total = working_hours(s, e, &window);
            assert!(total >= previous, "total decreased at offset {hour_offset}");
            previous = total;
        }
    }

    #[test]
    fn test_never_negative() {
        let window = DailyWindow::from_hours(7, 20).unwrap();
        let s = utc(2023, 1, 1, 23, 0);
        for day in 0..10 {
            for hour in 0..24 {
                let e = utc(2023, 1, 1 + day, hour, 0);
                assert!(working_hours(s, e, &window) >= 0.0);
            }
        }
    }
}
