//! Channel identifier and boundary parsing rules. Pure functions, no I/O.
//!
//! These run before any network call so malformed input never opens a stream.

use crate::domain::DomainError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Strip URL or `@` decoration from a channel identifier.
///
/// Accepts a bare handle, an `@handle`, or a full `https://t.me/handle` URL
/// (last path segment wins). Anything else is returned unchanged.
pub fn normalize_channel(input: &str) -> &str {
    if let Some(rest) = input.strip_prefix("https://t.me/") {
        rest.rsplit('/').next().unwrap_or(rest)
    } else if let Some(handle) = input.strip_prefix('@') {
        handle
    } else {
        input
    }
}

/// Split a `https://t.me/<channel>/<id>` message URL into its parts.
///
/// Requires at least 5 `/`-separated segments with a numeric id; everything
/// else is [`DomainError::MalformedMessageUrl`].
pub fn parse_message_url(url: &str) -> Result<(String, i32), DomainError> {
    let parts: Vec<&str> = url.split('/').collect();
    if parts.len() < 5 {
        return Err(DomainError::MalformedMessageUrl(url.to_string()));
    }
    let channel = parts[3].to_string();
    let message_id = parts[4]
        .parse::<i32>()
        .map_err(|_| DomainError::MalformedMessageUrl(url.to_string()))?;
    Ok((channel, message_id))
}

/// Parse a `YYYY-MM-DD` date into the UTC-midnight boundary used by the
/// stats filter. Messages with a timestamp strictly after this instant are
/// skipped, so the boundary day itself is only eligible at exactly midnight.
pub fn parse_date_boundary(value: &str) -> Result<DateTime<Utc>, DomainError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| DomainError::InvalidDateFormat(value.to_string()))
}
