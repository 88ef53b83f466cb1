//! Monday-start calendar weeks.
//!
//! Every update is bucketed by the Monday that opens its week. All arithmetic
//! is done on plain calendar dates: no timezone conversion happens here, so
//! "today" is whatever date the caller's clock reports.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::AppError;

/// The Monday that opens a Monday–Sunday week.
///
/// Only constructed through [`week_start`], so a value of this type is
/// always a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct WeekStart(NaiveDate);

impl WeekStart {
    /// Parse a `YYYY-MM-DD` date (four-digit year) and normalize it to the
    /// Monday of its week.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let invalid =
            || AppError::Validation(format!("week must be a YYYY-MM-DD date, got '{}'", value));

        let raw = value.trim();
        let well_formed = raw.len() == 10
            && raw.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(invalid());
        }

        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(week_start(date))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn previous(self) -> Self {
        previous_week(self.0)
    }

    pub fn next(self) -> Self {
        next_week(self.0)
    }

    pub fn label(self) -> String {
        format_week(self.0)
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Monday of the week containing `date`. Sunday belongs to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> WeekStart {
    let day = i64::from(date.weekday().num_days_from_sunday());
    let offset = if day == 0 { -6 } else { 1 - day };
    WeekStart(date + Duration::days(offset))
}

pub fn previous_week(date: NaiveDate) -> WeekStart {
    week_start(date - Duration::days(7))
}

pub fn next_week(date: NaiveDate) -> WeekStart {
    week_start(date + Duration::days(7))
}

pub fn is_current_week(date: NaiveDate, today: NaiveDate) -> bool {
    week_start(date) == week_start(today)
}

/// Only the current week's update may be changed.
pub fn can_edit(week: WeekStart, today: NaiveDate) -> bool {
    is_current_week(week.date(), today)
}

/// Renders `date` as e.g. `Jun 3, 2024`.
pub fn format_week(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_start_is_monday_and_idempotent() {
        let mut date = d(2022, 12, 1);
        while date < d(2026, 2, 1) {
            let start = week_start(date);
            assert_eq!(start.date().weekday(), Weekday::Mon, "{}", date);
            assert_eq!(week_start(start.date()), start);
            assert!(start.date() <= date);
            assert!((date - start.date()).num_days() < 7);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_sunday_rolls_back_to_previous_monday() {
        assert_eq!(week_start(d(2024, 1, 7)).date(), d(2024, 1, 1));
        assert_eq!(week_start(d(2024, 6, 9)).date(), d(2024, 6, 3));
        // Monday stays put
        assert_eq!(week_start(d(2024, 6, 10)).date(), d(2024, 6, 10));
    }

    #[test]
    fn test_navigation_crosses_year_boundary() {
        assert_eq!(previous_week(d(2024, 1, 1)).date(), d(2023, 12, 25));
        assert_eq!(next_week(d(2023, 12, 28)).date(), d(2024, 1, 1));
        assert_eq!(next_week(d(2024, 2, 26)).date(), d(2024, 3, 4));
    }

    #[test]
    fn test_previous_then_next_round_trips() {
        let mut date = d(2023, 11, 20);
        for _ in 0..120 {
            assert_eq!(next_week(previous_week(date).date()), week_start(date));
            assert_eq!(week_start(date).previous().next(), week_start(date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_current_week_and_edit_policy() {
        let today = d(2024, 6, 5);
        let current = week_start(today);
        assert!(is_current_week(current.date(), today));
        assert!(is_current_week(d(2024, 6, 9), today));
        assert!(!is_current_week(previous_week(today).date(), today));
        assert!(!is_current_week(d(2024, 6, 10), today));

        assert!(can_edit(current, today));
        assert!(!can_edit(current.previous(), today));
    }

    #[test]
    fn test_format_week() {
        assert_eq!(format_week(d(2024, 6, 3)), "Jun 3, 2024");
        assert_eq!(week_start(d(2023, 12, 31)).label(), "Dec 25, 2023");
    }

    #[test]
    fn test_parse_normalizes_to_monday() {
        assert_eq!(WeekStart::parse("2024-06-05").unwrap().date(), d(2024, 6, 3));
        assert_eq!(WeekStart::parse("2024-06-03").unwrap().to_string(), "2024-06-03");
        assert!(matches!(WeekStart::parse("06/03/2024"), Err(AppError::Validation(_))));
        assert!(WeekStart::parse("2024-02-30").is_err());
        assert!(WeekStart::parse("2024-6-5").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_years() {
        for raw in ["-262143-01-01", "+262142-12-31", "20240-01-01", "+2024-01-01"] {
            assert!(
                matches!(WeekStart::parse(raw), Err(AppError::Validation(_))),
                "{}",
                raw
            );
        }

        // Extremes of the accepted range still navigate without overflow
        let last = WeekStart::parse("9999-12-31").unwrap();
        assert_eq!(last.next().date() - last.date(), Duration::days(7));
        let first = WeekStart::parse("0000-01-01").unwrap();
        assert!(first.previous() < first);
    }
}
