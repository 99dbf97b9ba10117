//! Infrastructure adapters. Implement outbound ports.
//!
//! Telegram transport plus the CLI surface. Map errors to DomainError.

pub mod cli;
pub mod telegram;
