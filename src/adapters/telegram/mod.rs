//! Telegram adapters: grammers-backed gateway, auth, and session handling.

pub mod auth_adapter;
pub mod client;
pub mod mapper;
pub mod session;

pub use auth_adapter::GrammersAuthAdapter;
pub use client::GrammersChannelGateway;
