//! Day-first dotted dates (`dd.mm.yyyy`) and whole days elapsed since them.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateAgeError {
    #[error("date is empty")]
    Empty,
    #[error("'{0}' is not day.month.year")]
    Shape(String),
    #[error("'{0}' has a non-numeric component")]
    NotNumeric(String),
    #[error("'{0}' is not a calendar date")]
    InvalidDate(String),
}

/// Parse `day.month.year`. Each component must be a plain integer and the
/// result must be a real calendar date (no 31.02, no month 13).
pub fn parse_day_month_year(value: &str) -> Result<NaiveDate, DateAgeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DateAgeError::Empty);
    }

    let parts: Vec<&str> = value.split('.').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(DateAgeError::Shape(value.to_string()));
    };

    let not_numeric = || DateAgeError::NotNumeric(value.to_string());
    let day: u32 = day.parse().map_err(|_| not_numeric())?;
    let month: u32 = month.parse().map_err(|_| not_numeric())?;
    let year: i32 = year.parse().map_err(|_| not_numeric())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateAgeError::InvalidDate(value.to_string()))
}

/// Whole days from local midnight of `date` to `now`, floored.
/// Negative when `date` is after `now`.
pub fn days_between(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let seconds = (now - date.and_time(chrono::NaiveTime::MIN)).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY)
}

/// Parse `value` and return the days elapsed until `now`.
pub fn days_since(value: &str, now: NaiveDateTime) -> Result<i64, DateAgeError> {
    parse_day_month_year(value).map(|date| days_between(date, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn parses_day_first() {
        let date = parse_day_month_year("05.11.2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 5).unwrap());
        assert_eq!(parse_day_month_year("5.1.2024").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse_day_month_year(""), Err(DateAgeError::Empty));
        assert_eq!(parse_day_month_year("   "), Err(DateAgeError::Empty));
        assert!(matches!(parse_day_month_year("abc"), Err(DateAgeError::Shape(_))));
        assert!(matches!(parse_day_month_year("2024-01-05"), Err(DateAgeError::Shape(_))));
        assert!(matches!(parse_day_month_year("1.2.3.4"), Err(DateAgeError::Shape(_))));
        assert!(matches!(parse_day_month_year("aa.bb.cccc"), Err(DateAgeError::NotNumeric(_))));
        assert!(matches!(parse_day_month_year("1..2024"), Err(DateAgeError::NotNumeric(_))));
        assert!(matches!(parse_day_month_year("31.13.2024"), Err(DateAgeError::InvalidDate(_))));
        assert!(matches!(parse_day_month_year("31.04.2024"), Err(DateAgeError::InvalidDate(_))));
        assert!(matches!(parse_day_month_year("29.02.2023"), Err(DateAgeError::InvalidDate(_))));
        assert!(matches!(parse_day_month_year("0.01.2024"), Err(DateAgeError::InvalidDate(_))));
    }

    #[test]
    fn leap_day_is_valid() {
        assert!(parse_day_month_year("29.02.2024").is_ok());
    }

    #[test]
    fn days_are_floored() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(days_between(date, at(2024, 12, 31, 0)), 0);
        assert_eq!(days_between(date, at(2024, 12, 31, 23)), 0);
        assert_eq!(days_between(date, at(2025, 1, 1, 0)), 1);
        assert_eq!(days_between(date, at(2025, 1, 1, 12)), 1);
    }

    #[test]
    fn future_dates_are_negative() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(days_between(date, at(2025, 1, 1, 12)), -1);
        assert_eq!(days_between(date, at(2025, 1, 1, 0)), -1);
    }

    #[test]
    fn days_since_against_fixed_now() {
        let now = at(2025, 1, 1, 0);
        assert_eq!(days_since("01.01.2024", now), Ok(366));
        assert_eq!(days_since("01.06.2024", now), Ok(214));
        assert!(days_since("", now).is_err());
    }
}
