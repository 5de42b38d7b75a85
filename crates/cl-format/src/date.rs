//! Date and date-time formatting in Chilean `dd/mm/yyyy` style

use crate::{FormatError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Naive layouts accepted besides RFC 3339
const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Format a date as `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format a date-time as `dd/mm/yyyy HH:MM`
pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format("%d/%m/%Y %H:%M").to_string()
}

/// Parse a stored timestamp into a wall-clock date-time
///
/// Accepts RFC 3339 (`2024-03-05T14:30:00Z`), database style with an
/// offset (`2024-03-05 14:30:00+00`), naive date-times and bare dates.
///
/// # Arguments
/// * `input` - Timestamp text
/// * `offset_minutes` - Display offset from UTC. Timestamps that carry an
///   offset are converted to it; naive timestamps are taken as already local.
///   With `None`, a timestamp keeps its own offset.
pub fn parse_timestamp(input: &str, offset_minutes: Option<i32>) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    let invalid = || FormatError::InvalidDate(input.to_string());

    let with_offset = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z"));
    if let Ok(date_time) = with_offset {
        return match offset_minutes {
            Some(minutes) => {
                let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(invalid)?;
                Ok(date_time.with_timezone(&offset).naive_local())
            }
            None => Ok(date_time.naive_local()),
        };
    }

    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    {
        return Ok(naive);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)
}

/// Parse and format as `dd/mm/yyyy`
///
/// Bare dates are formatted as given, without any offset shift.
pub fn format_date_str(input: &str, offset_minutes: Option<i32>) -> Result<String> {
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(format_date(date));
    }
    parse_timestamp(input, offset_minutes).map(|dt| format_date(dt.date()))
}

/// Parse and format as `dd/mm/yyyy HH:MM`
pub fn format_date_time_str(input: &str, offset_minutes: Option<i32>) -> Result<String> {
    parse_timestamp(input, offset_minutes).map(format_date_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "05/03/2024");
    }

    #[test]
    fn test_rfc3339_keeps_own_offset() {
        assert_eq!(
            format_date_time_str("2024-03-05T14:30:00-03:00", None).unwrap(),
            "05/03/2024 14:30"
        );
    }

    #[test]
    fn test_display_offset_applied() {
        // 02:10 UTC is the previous evening in Santiago (UTC-3)
        assert_eq!(
            format_date_time_str("2024-03-05T02:10:00Z", Some(-180)).unwrap(),
            "04/03/2024 23:10"
        );
        assert_eq!(
            format_date_str("2024-03-05T02:10:00Z", Some(-180)).unwrap(),
            "04/03/2024"
        );
    }

    #[test]
    fn test_database_style_timestamp() {
        assert_eq!(
            format_date_time_str("2024-12-31 09:05:07.123456+00", None).unwrap(),
            "31/12/2024 09:05"
        );
    }

    #[test]
    fn test_naive_forms() {
        assert_eq!(
            format_date_time_str("2024-01-02 08:00:00", Some(-180)).unwrap(),
            "02/01/2024 08:00"
        );
        assert_eq!(format_date_str("2024-01-02", Some(-180)).unwrap(), "02/01/2024");
        assert_eq!(
            format_date_time_str("2024-01-02", None).unwrap(),
            "02/01/2024 00:00"
        );
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(
            format_date_str("pronto", None),
            Err(FormatError::InvalidDate("pronto".to_string()))
        );
    }
}
