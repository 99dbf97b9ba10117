//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Every kind propagates to
//! the top level unrecovered and becomes one line on stderr plus exit code 1.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// `--max-date` value does not match the `YYYY-MM-DD` calendar pattern.
    #[error("invalid date format '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    /// Message URL has too few path segments or a non-numeric id.
    #[error("malformed message URL '{0}': expected https://t.me/channel/123")]
    MalformedMessageUrl(String),

    /// The by-id lookup returned no message.
    #[error("message not found: {0}")]
    NotFound(String),

    /// Any failure surfaced by the Telegram client: unknown channel, RPC
    /// error, network failure. Never retried at this layer.
    #[error("Telegram transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    /// Writing a report/CSV to its sink failed.
    #[error("output error: {0}")]
    Output(String),
}
