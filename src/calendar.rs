use chrono::{Datelike, Days, Duration, Months, NaiveDate, Weekday};

use crate::error::{PlanError, Result};

const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)
        .map_err(|_| PlanError::InvalidDateFormat(s.to_string()))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date + Duration::days(n)
}

/// Adds whole months, clamping to the last day of a shorter month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n)).unwrap_or(NaiveDate::MAX)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let next = start_of_month(date) + Months::new(1);
    next - Days::new(1)
}

pub fn each_day(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_and_format() {
        let d = parse_iso_date("2026-01-14").unwrap();
        assert_eq!(d, date(2026, 1, 14));
        assert_eq!(format_iso_date(d), "2026-01-14");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "2026/01/14", "14-01-2026", "2026-02-30", "tomorrow"] {
            match parse_iso_date(bad) {
                Err(PlanError::InvalidDateFormat(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidDateFormat for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2026, 1, 14), date(2026, 1, 16)), 2);
        assert_eq!(days_between(date(2026, 1, 16), date(2026, 1, 14)), -2);
        assert_eq!(days_between(date(2026, 2, 28), date(2026, 3, 1)), 1);
    }

    #[test]
    fn weekend_and_day_of_week() {
        // 2026-01-17 is a Saturday
        assert!(is_weekend(date(2026, 1, 17)));
        assert!(is_weekend(date(2026, 1, 18)));
        assert!(!is_weekend(date(2026, 1, 19)));
        assert_eq!(day_of_week(date(2026, 1, 18)), 0);
        assert_eq!(day_of_week(date(2026, 1, 19)), 1);
        assert_eq!(day_of_week(date(2026, 1, 17)), 6);
    }

    #[test]
    fn month_bounds() {
        assert_eq!(start_of_month(date(2026, 2, 17)), date(2026, 2, 1));
        assert_eq!(end_of_month(date(2026, 2, 17)), date(2026, 2, 28));
        assert_eq!(end_of_month(date(2028, 2, 1)), date(2028, 2, 29));
        assert_eq!(end_of_month(date(2026, 12, 5)), date(2026, 12, 31));
    }

    #[test]
    fn add_months_clamps() {
        assert_eq!(add_months(date(2026, 1, 31), 1), date(2026, 2, 28));
        assert_eq!(add_months(date(2026, 1, 14), 5), date(2026, 6, 14));
    }

    #[test]
    fn each_day_inclusive_and_empty() {
        let days: Vec<_> = each_day(date(2026, 1, 30), date(2026, 2, 2)).collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], date(2026, 2, 2));
        assert_eq!(each_day(date(2026, 1, 2), date(2026, 1, 1)).count(), 0);
    }
}
