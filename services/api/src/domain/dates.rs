//! Parsing and range validation for the date/time strings the API accepts.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ApiError;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidInput(format!("invalid date: {value}")))
}

/// Parse an RFC 3339 timestamp, normalized to UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::InvalidInput(format!("invalid timestamp: {value}")))
}

/// Availability ranges are inclusive, so a single-day period has
/// `start == end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::InvalidInput(
            "startDate must not be after endDate".to_owned(),
        ));
    }
    Ok(())
}

/// Events must have a positive duration.
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ApiError> {
    if start >= end {
        return Err(ApiError::InvalidInput(
            "start must be before end".to_owned(),
        ));
    }
    Ok(())
}
