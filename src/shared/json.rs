//! JSON rendering for reports. Human-readable, machine-stable.

use crate::domain::DomainError;
use serde::Serialize;

/// Serialize any record/report to pretty JSON: 2-space indentation, non-ASCII
/// characters preserved literally (serde_json never ASCII-escapes).
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string_pretty(value).map_err(|e| DomainError::Output(e.to_string()))
}
