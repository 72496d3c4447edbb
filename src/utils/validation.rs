//! Field normalization for incoming payloads.
//!
//! Everything here is pure: no I/O, no database lookups. Each function
//! returns the normalized value or an [`ApiError::Validation`] whose
//! message names the offending field.

use std::str::FromStr;

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::error::ApiError;
use crate::model::attendance::AttendanceStatus;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trims surrounding whitespace and rejects empty results.
pub fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims, checks the address grammar, and lowercases the domain part.
pub fn email(value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if !trimmed.validate_email() {
        return Err(ApiError::validation("invalid email"));
    }

    // validate_email guarantees exactly one usable '@' split
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => Ok(format!("{}@{}", local, domain.to_lowercase())),
        None => Err(ApiError::validation("invalid email")),
    }
}

/// Accepts exactly `Present` or `Absent`.
pub fn status(value: &str) -> Result<AttendanceStatus, ApiError> {
    AttendanceStatus::from_str(value).map_err(|_| ApiError::validation("invalid status"))
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn date(value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    // chrono also accepts unpadded fields and skips inner whitespace
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ApiError::validation("invalid date"));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ApiError::validation("invalid date"))
}

/// Same as [`date`] for optional query parameters.
pub fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    value.map(date).transpose()
}

pub fn optional_status(value: Option<&str>) -> Result<Option<AttendanceStatus>, ApiError> {
    value.map(status).transpose()
}
