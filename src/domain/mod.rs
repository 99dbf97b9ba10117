//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod channel;
pub mod entities;
pub mod errors;

pub use channel::{normalize_channel, parse_date_boundary, parse_message_url};
pub use entities::{ChannelReport, MessageDetail, MessageRecord, ReportMessage, SignInResult};
pub use errors::DomainError;
