//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, MessageDetail, MessageRecord, SignInResult};

/// Lazy newest-first message sequence over a channel's history.
///
/// Each `next()` may suspend on a page fetch; these awaits are the only
/// suspension points of a command. A stream is restartable per call to
/// [`ChannelGateway::iter_messages`], not resumable mid-iteration.
#[async_trait::async_trait]
pub trait MessageStream: Send {
    /// Next message, or `None` once history (or the requested cap) is
    /// exhausted. Transport failures abort the stream; there is no retry.
    async fn next(&mut self) -> Result<Option<MessageRecord>, DomainError>;
}

/// Telegram channel gateway. Resolve handles, stream history, fetch by id.
#[async_trait::async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Open a newest-first stream over the channel's messages.
    ///
    /// - `channel`: bare handle (already normalized).
    /// - `limit`: `Some(n)` caps the stream at the n most recent messages;
    ///   `None` walks the whole history.
    async fn iter_messages(
        &self,
        channel: &str,
        limit: Option<usize>,
    ) -> Result<Box<dyn MessageStream>, DomainError>;

    /// Fetch exactly one message by id. `Ok(None)` when the channel has no
    /// message with that id.
    async fn get_message(
        &self,
        channel: &str,
        message_id: i32,
    ) -> Result<Option<MessageDetail>, DomainError>;
}

/// Authentication port: login/2FA flow over an established connection.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    /// True when the persisted session is already authorized.
    async fn is_authenticated(&self) -> Result<bool, DomainError>;

    /// Request a login code to be sent to `phone`.
    async fn request_login_code(&self, phone: &str) -> Result<(), DomainError>;

    /// Submit the login code. May report that a 2FA password is required.
    async fn sign_in(&self, code: &str) -> Result<SignInResult, DomainError>;

    /// Submit the 2FA password after `sign_in` asked for one.
    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError>;
}
