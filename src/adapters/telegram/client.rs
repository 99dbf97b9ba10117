//! Implements ChannelGateway using the grammers Client.
//!
//! Resolves public usernames once per process (cached) and pages channel
//! history backward with raw GetHistory invocations, newest first.

use crate::adapters::telegram::mapper;
use crate::domain::{DomainError, MessageDetail, MessageRecord};
use crate::ports::{ChannelGateway, MessageStream};
use async_trait::async_trait;
use grammers_client::{grammers_tl_types as tl, Client};
use grammers_session::PackedChat;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;

/// Messages requested per GetHistory call. Telegram serves at most 100.
const PAGE_SIZE: usize = 100;

/// Telegram gateway adapter. Wraps a grammers Client (cloned freely; clones
/// share the connection and session).
pub struct GrammersChannelGateway {
    client: Client,
    /// Cache PackedChat by handle so repeated commands against the same
    /// channel resolve the username once (avoids FLOOD_WAIT on resolve).
    peer_cache: Mutex<HashMap<String, PackedChat>>,
}

impl GrammersChannelGateway {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            peer_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a bare handle to a PackedChat, using the cache first.
    async fn resolve(&self, handle: &str) -> Result<PackedChat, DomainError> {
        if let Some(packed) = self.peer_cache.lock().await.get(handle).cloned() {
            return Ok(packed);
        }
        let chat = self
            .client
            .resolve_username(handle)
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?
            .ok_or_else(|| DomainError::Transport(format!("channel '{}' not found", handle)))?;
        let packed = chat.pack();
        debug!(handle, id = packed.id, "resolved channel username");
        self.peer_cache
            .lock()
            .await
            .insert(handle.to_string(), packed.clone());
        Ok(packed)
    }
}

#[async_trait]
impl ChannelGateway for GrammersChannelGateway {
    async fn iter_messages(
        &self,
        channel: &str,
        limit: Option<usize>,
    ) -> Result<Box<dyn MessageStream>, DomainError> {
        let packed = self.resolve(channel).await?;
        Ok(Box::new(HistoryStream::new(
            self.client.clone(),
            packed.to_input_peer(),
            limit,
        )))
    }

    async fn get_message(
        &self,
        channel: &str,
        message_id: i32,
    ) -> Result<Option<MessageDetail>, DomainError> {
        let packed = self.resolve(channel).await?;
        let id = vec![tl::enums::InputMessage::Id(tl::types::InputMessageId {
            id: message_id,
        })];
        // Channels need the channel-scoped request; messages.getMessages only
        // covers private chats and basic groups.
        let fetched = match packed.try_to_input_channel() {
            Some(channel) => {
                self.client
                    .invoke(&tl::functions::channels::GetMessages { channel, id })
                    .await
            }
            None => {
                self.client
                    .invoke(&tl::functions::messages::GetMessages { id })
                    .await
            }
        };
        let raw = fetched.map_err(|e| DomainError::Transport(e.to_string()))?;

        Ok(split_messages(raw).first().and_then(mapper::message_detail))
    }
}

/// Backward-paging history stream. Buffers one GetHistory page at a time and
/// hands out mapped records newest first.
struct HistoryStream {
    client: Client,
    peer: tl::enums::InputPeer,
    buffer: VecDeque<MessageRecord>,
    /// Paging cursor: fetch messages with id strictly below this (0 = newest).
    offset_id: i32,
    /// Records still owed to the caller; `None` streams the whole history.
    remaining: Option<usize>,
    done: bool,
}

impl HistoryStream {
    fn new(client: Client, peer: tl::enums::InputPeer, limit: Option<usize>) -> Self {
        Self {
            client,
            peer,
            buffer: VecDeque::new(),
            offset_id: 0,
            remaining: limit,
            done: false,
        }
    }

    async fn fetch_page(&mut self) -> Result<(), DomainError> {
        let page_limit = self.remaining.map_or(PAGE_SIZE, |n| n.min(PAGE_SIZE)) as i32;
        let req = tl::functions::messages::GetHistory {
            peer: self.peer.clone(),
            offset_id: self.offset_id,
            offset_date: 0,
            add_offset: 0,
            limit: page_limit,
            max_id: 0,
            min_id: 0,
            hash: 0,
        };
        let raw = self
            .client
            .invoke(&req)
            .await
            .map_err(|e| DomainError::Transport(e.to_string()))?;
        let raw_messages = split_messages(raw);

        if raw_messages.is_empty() {
            self.done = true;
            return Ok(());
        }
        // Next page continues strictly below the oldest id seen. Cursor comes
        // from the raw page, not the mapped buffer, so dropped service
        // messages cannot stall paging.
        if let Some(min_id) = raw_messages.iter().map(mapper::raw_message_id).min() {
            self.offset_id = min_id;
        }
        if raw_messages.len() < page_limit as usize {
            self.done = true;
        }
        self.buffer
            .extend(raw_messages.iter().filter_map(mapper::message_record));
        debug!(
            count = raw_messages.len(),
            offset_id = self.offset_id,
            "history page fetched"
        );
        Ok(())
    }
}

#[async_trait]
impl MessageStream for HistoryStream {
    async fn next(&mut self) -> Result<Option<MessageRecord>, DomainError> {
        loop {
            if self.remaining == Some(0) {
                return Ok(None);
            }
            if let Some(record) = self.buffer.pop_front() {
                if let Some(n) = self.remaining.as_mut() {
                    *n -= 1;
                }
                return Ok(Some(record));
            }
            if self.done {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }
}

fn split_messages(raw: tl::enums::messages::Messages) -> Vec<tl::enums::Message> {
    use tl::enums::messages::Messages;
    match raw {
        Messages::Messages(m) => m.messages,
        Messages::Slice(m) => m.messages,
        Messages::ChannelMessages(m) => m.messages,
        Messages::NotModified(_) => Vec::new(),
    }
}
