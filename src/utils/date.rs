use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Storage format for wall-clock timestamps (sorts lexicographically).
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local wall-clock time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

pub fn format_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Parse "YYYY-MM-DD HH:MM:SS", also accepting the ISO `T` separator.
pub fn parse_ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_round_trip_through_storage_format() {
        let ts = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 5)
            .unwrap();
        assert_eq!(format_ts(&ts), "2025-06-01 08:30:05");
        assert_eq!(parse_ts("2025-06-01 08:30:05"), Some(ts));
        assert_eq!(parse_ts("2025-06-01T08:30:05"), Some(ts));
        assert_eq!(parse_ts("yesterday"), None);
    }

    #[test]
    fn parse_date_reports_the_bad_input() {
        match parse_date("2025-13-01") {
            Err(AppError::InvalidDate(s)) => assert_eq!(s, "2025-13-01"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
