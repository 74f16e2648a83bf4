//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDateTime, Utc};

/// UTC timestamp attached to measurements.
pub type Timestamp = DateTime<Utc>;

/// Layout used by stores that keep naive `YYYY-MM-DD HH:MM:SS` text.
const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 as well as naive `YYYY-MM-DD HH:MM:SS[.fff]` text,
/// which is read as UTC.
///
/// # Errors
///
/// Returns the RFC 3339 parse error when neither layout matches.
pub fn parse(value: &str) -> Result<Timestamp, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Ok(ts.to_utc()),
        Err(err) => NaiveDateTime::parse_from_str(value, NAIVE_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| err),
    }
}
