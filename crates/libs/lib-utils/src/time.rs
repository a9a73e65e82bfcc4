//! # Time Utilities
//!
//! UTC timestamps as persisted in session records and shown in the terminal.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format as RFC3339 with second precision and a `Z` suffix.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse any RFC3339 timestamp, normalizing its offset to UTC.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp(moment.to_string()))
}

/// Whole seconds elapsed since `moment`, clamped at zero for timestamps in the future.
pub fn seconds_since(moment: DateTime<Utc>) -> u64 {
    (now_utc() - moment).num_seconds().max(0) as u64
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidTimestamp(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidTimestamp(moment) => write!(fmt, "not an RFC3339 timestamp: {moment}"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_and_format() {
        let parsed = parse_utc("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(format_time(parsed), "2024-05-01T07:30:00Z");
        assert_eq!(
            parse_utc("yesterday"),
            Err(Error::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_seconds_since() {
        assert!(seconds_since(now_utc() - Duration::seconds(90)) >= 90);
        assert_eq!(seconds_since(now_utc() + Duration::hours(1)), 0);
    }
}
