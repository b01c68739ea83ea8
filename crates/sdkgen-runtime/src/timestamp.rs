//! The `Timestamp` record, wrapping the three wire formats Smithy's
//! `timestampFormat` trait names (`date-time`, `http-date`,
//! `epoch-seconds`) around a single `chrono` instant.

use chrono::{DateTime, Utc};

/// A point in time, convertible to and from any of Smithy's timestamp
/// wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an existing `chrono` instant.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse Smithy's `epoch-seconds` format.
    #[must_use]
    pub fn from_epoch_seconds(seconds: f64) -> Self {
        let secs = seconds.trunc() as i64;
        let nanos = (seconds.fract() * 1_000_000_000.0).round() as u32;
        Self(DateTime::from_timestamp(secs, nanos).unwrap_or_default())
    }

    /// Parse Smithy's `date-time` (ISO 8601) format.
    ///
    /// # Errors
    /// Propagates `chrono`'s parse error if `text` isn't valid RFC 3339.
    pub fn from_date_time(text: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc)))
    }

    /// Parse Smithy's `http-date` (RFC 2822) format.
    ///
    /// # Errors
    /// Propagates `chrono`'s parse error if `text` isn't a valid HTTP date.
    pub fn from_http_date(text: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc2822(text)?.with_timezone(&Utc)))
    }

    /// Render as Smithy's `epoch-seconds` format.
    #[must_use]
    pub fn to_epoch_seconds(self) -> f64 {
        self.0.timestamp() as f64 + f64::from(self.0.timestamp_subsec_nanos()) / 1_000_000_000.0
    }

    /// Render as Smithy's `date-time` (ISO 8601) format.
    #[must_use]
    pub fn to_date_time(self) -> String {
        self.0.to_rfc3339()
    }

    /// Render as Smithy's `http-date` (RFC 2822) format.
    #[must_use]
    pub fn to_http_date(self) -> String {
        self.0.to_rfc2822()
    }

    /// The underlying `chrono` instant.
    #[must_use]
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_epoch_seconds() {
        let ts = Timestamp::from_epoch_seconds(1_609_459_200.0);
        assert_eq!(ts.to_epoch_seconds(), 1_609_459_200.0);
    }

    #[test]
    fn parses_and_renders_date_time() {
        let ts = Timestamp::from_date_time("2021-01-01T00:00:00Z").unwrap();
        assert_eq!(ts.to_epoch_seconds(), 1_609_459_200.0);
    }
}
