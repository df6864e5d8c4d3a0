use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::PayloadError;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO-8601 timestamp as sent by the nodes
///
/// Timestamps with an offset get converted to UTC, naive ones are taken as UTC.
/// A bare date stands for midnight of that day.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PayloadError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
        .ok_or_else(|| PayloadError::InvalidTimestamp(raw.to_owned()))
}
