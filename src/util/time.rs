//! Time and date parsing utilities.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Parse a stored timestamp.
///
/// Accepts RFC3339 (what we write) and `YYYY-MM-DD HH:MM:SS` (what
/// `SQLite`'s `CURRENT_TIMESTAMP` and hand-edited rows produce).
#[must_use]
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for storage.
///
/// Fixed microsecond width so stored values sort lexically in time order.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Long calendar date, e.g. `January 5, 2026`.
#[must_use]
pub fn format_long_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// Short date used in issue lines, e.g. `2026-01-05`.
#[must_use]
pub fn format_short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2026-01-05T10:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_sqlite_timestamp() {
        let dt = parse_datetime("2026-01-05 08:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn test_formatting() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(format_long_date(&dt), "January 5, 2026");
        assert_eq!(format_short_date(&dt), "2026-01-05");
        assert_eq!(parse_datetime(&format_datetime(&dt)), Some(dt));
    }
}
