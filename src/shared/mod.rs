//! Cross-cutting helpers: configuration, JSON rendering, progress feedback.

pub mod config;
pub mod json;
pub mod progress;
