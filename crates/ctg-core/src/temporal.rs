//! # Calendar Dates
//!
//! Defines [`CalendarDate`], the coerced form of every date field in a
//! project record.
//!
//! Record files are edited by hand, so date strings arrive in several
//! shapes. All of the following are accepted:
//!
//! | Input | Coerced to |
//! |---|---|
//! | `2021` | 2021-01-01 |
//! | `2021-05` | 2021-05-01 |
//! | `2021-05-17` | 2021-05-17 |
//! | `2021-05-17T09:30`, `2021-05-17T09:30:00.250` | 2021-05-17 |
//! | `2021-05-17T09:30:00Z`, `2021-05-17T23:00:00-05:00` | 2021-05-17 |
//!
//! The calendar date is always the one written in the string. Offsets are
//! parsed for well-formedness and otherwise ignored, so coercion never moves
//! a date across midnight.
//!
//! Bare JSON numbers are not dates. A number in a date position is a year,
//! and that decision belongs to the schema, not to this type.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CtgError;

/// A calendar date with no time-of-day or offset.
///
/// Serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Build a date from its components.
    ///
    /// # Errors
    ///
    /// Returns [`CtgError::InvalidDate`] if the components do not name a real day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CtgError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CtgError::InvalidDate {
                input: format!("{year:04}-{month:02}-{day:02}"),
                reason: "no such calendar day".to_string(),
            })
    }

    /// Coerce a date string to a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`CtgError::InvalidDate`] if the string matches none of the
    /// accepted shapes or names a day that does not exist.
    pub fn parse(s: &str) -> Result<Self, CtgError> {
        let invalid = |reason: &str| CtgError::InvalidDate {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let bytes = s.as_bytes();
        match bytes.len() {
            4 if all_digits(s) => {
                let year: i32 = s.parse().map_err(|_| invalid("year out of range"))?;
                Self::from_ymd(year, 1, 1).map_err(|_| invalid("year out of range"))
            }
            7 if bytes[4] == b'-' && all_digits(&s[..4]) && all_digits(&s[5..]) => {
                let year: i32 = s[..4].parse().map_err(|_| invalid("year out of range"))?;
                let month: u32 = s[5..].parse().map_err(|_| invalid("month out of range"))?;
                Self::from_ymd(year, month, 1).map_err(|_| invalid("month out of range"))
            }
            10 => parse_full_date(s).map(Self).ok_or_else(|| invalid("expected YYYY-MM-DD")),
            n if n > 10 && bytes[10] == b'T' => parse_date_time(s)
                .map(Self)
                .ok_or_else(|| invalid("expected YYYY-MM-DDTHH:MM[:SS] with optional offset")),
            _ => Err(invalid("unrecognized date shape")),
        }
    }

    /// Access the inner `NaiveDate`.
    pub fn as_naive_date(&self) -> &NaiveDate {
        &self.0
    }

    /// The year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Render as `YYYY-MM-DD`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY-MM-DD` with exactly two-digit month and day.
fn parse_full_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !(all_digits(&s[..4]) && all_digits(&s[5..7]) && all_digits(&s[8..])) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_date_time(s: &str) -> Option<NaiveDate> {
    let date = parse_full_date(&s[..10])?;
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return Some(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if NaiveDateTime::parse_from_str(s, fmt).is_ok() {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_full_date() {
        assert_eq!(CalendarDate::parse("2021-05-01").unwrap(), ymd(2021, 5, 1));
    }

    #[test]
    fn test_year_only() {
        assert_eq!(CalendarDate::parse("1950").unwrap(), ymd(1950, 1, 1));
    }

    #[test]
    fn test_year_month() {
        assert_eq!(CalendarDate::parse("2020-02").unwrap(), ymd(2020, 2, 1));
        assert!(CalendarDate::parse("2020-13").is_err());
    }

    #[test]
    fn test_datetime_keeps_written_date() {
        assert_eq!(CalendarDate::parse("2021-05-17T23:00:00-05:00").unwrap(), ymd(2021, 5, 17));
        assert_eq!(CalendarDate::parse("2021-05-17T00:30:00+09:00").unwrap(), ymd(2021, 5, 17));
        assert_eq!(CalendarDate::parse("2021-05-17T09:30:00Z").unwrap(), ymd(2021, 5, 17));
    }

    #[test]
    fn test_naive_datetime() {
        assert_eq!(CalendarDate::parse("2021-05-17T09:30").unwrap(), ymd(2021, 5, 17));
        assert_eq!(CalendarDate::parse("2021-05-17T09:30:00.250").unwrap(), ymd(2021, 5, 17));
    }

    #[test]
    fn test_rejects_impossible_days() {
        assert!(CalendarDate::parse("2021-02-30").is_err());
        assert!(CalendarDate::parse("2021-00-10").is_err());
    }

    #[test]
    fn test_rejects_other_shapes() {
        for input in ["", "21-05-01", "2021/05/01", "2021-5-1", "May 1 2021", "2021-05-01 10:00", "+2021"] {
            let err = CalendarDate::parse(input).unwrap_err();
            assert!(matches!(err, CtgError::InvalidDate { .. }), "{input:?} accepted");
        }
    }

    #[test]
    fn test_rejects_bad_time_suffix() {
        assert!(CalendarDate::parse("2021-05-17Tnoon").is_err());
        assert!(CalendarDate::parse("2021-05-17T25:00").is_err());
    }

    #[test]
    fn test_display_is_iso() {
        assert_eq!(ymd(2021, 5, 1).to_string(), "2021-05-01");
        assert_eq!(ymd(987, 1, 1).to_iso8601(), "0987-01-01");
    }

    #[test]
    fn test_display_parses_back() {
        let date = ymd(2024, 2, 29);
        assert_eq!(CalendarDate::parse(&date.to_string()).unwrap(), date);
    }

    #[test]
    fn test_ordering() {
        assert!(ymd(1899, 12, 31) < ymd(1900, 1, 1));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&ymd(2020, 1, 1)).unwrap();
        assert_eq!(json, "\"2020-01-01\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ymd(2020, 1, 1));
    }

    #[test]
    fn test_today_is_after_minimum_record_date() {
        assert!(CalendarDate::today() > ymd(2020, 1, 1));
    }
}
