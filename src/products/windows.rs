// src/products/windows.rs

use chrono::{Days, NaiveDate};

use anyhow::{Result, bail};

use crate::provider::DateWindow;

/// The two comparison windows around a fire event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireWindows {
    /// `[start - buffer, start)`, imagery from before the event.
    pub before: DateWindow,
    /// `[end, end + buffer)`, imagery from after the event.
    pub after: DateWindow,
}

/// Derive the pre/post windows from the event dates and the buffer.
pub fn fire_windows(start: NaiveDate, end: NaiveDate, buffer_days: i64) -> Result<FireWindows> {
    if buffer_days < 1 {
        bail!("buffer_days must be >= 1 (got {buffer_days})");
    }
    let buffer = Days::new(buffer_days as u64);

    let Some(before_start) = start.checked_sub_days(buffer) else {
        bail!("date window underflow subtracting {buffer_days} days from {start}");
    };
    let Some(after_end) = end.checked_add_days(buffer) else {
        bail!("date window overflow adding {buffer_days} days to {end}");
    };

    Ok(FireWindows {
        before: DateWindow {
            start: before_start,
            end: start,
        },
        after: DateWindow {
            start: end,
            end: after_end,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn windows_bracket_the_event() {
        let w = fire_windows(date("2024-09-01"), date("2024-11-08"), 30).unwrap();

        assert_eq!(w.before.start, date("2024-08-02"));
        assert_eq!(w.before.end, date("2024-09-01"));
        assert_eq!(w.after.start, date("2024-11-08"));
        assert_eq!(w.after.end, date("2024-12-08"));
    }

    #[test]
    fn buffer_crosses_year_boundaries() {
        let w = fire_windows(date("2024-01-10"), date("2024-12-20"), 30).unwrap();
        assert_eq!(w.before.start, date("2023-12-11"));
        assert_eq!(w.after.end, date("2025-01-19"));
    }

    #[test]
    fn zero_buffer_is_rejected() {
        assert!(fire_windows(date("2024-09-01"), date("2024-11-08"), 0).is_err());
    }
}
