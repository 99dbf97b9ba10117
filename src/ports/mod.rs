//! Port traits. API boundaries for the hexagon.
//!
//! Outbound only: the application calls into infrastructure. Command input
//! arrives through clap at the edge and needs no trait.

pub mod outbound;

pub use outbound::{AuthPort, ChannelGateway, MessageStream};
