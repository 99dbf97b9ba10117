//! Map Grammers types to domain entities.
//!
//! Extracts MessageRecord/MessageDetail from grammers_client tl types.
//! Empty and service messages carry no stats and map to None.

use crate::domain::{MessageDetail, MessageRecord};
use chrono::{DateTime, Utc};
use grammers_client::grammers_tl_types as tl;
use serde_json::json;

/// Map a raw history message to a domain record. Service messages (joins,
/// pins, channel-created markers) and empty placeholders are dropped.
pub fn message_record(msg: &tl::enums::Message) -> Option<MessageRecord> {
    let m = match msg {
        tl::enums::Message::Message(m) => m,
        tl::enums::Message::Empty(_) | tl::enums::Message::Service(_) => return None,
    };

    Some(MessageRecord {
        id: m.id,
        timestamp: timestamp(m.date),
        text: non_empty(&m.message),
        sender_id: m.from_id.as_ref().map(peer_id),
        has_media: m.media.is_some(),
        views: m.views,
        forwards: m.forwards,
        reply_to_id: m.reply_to.as_ref().and_then(reply_to_id),
    })
}

/// Map a by-id lookup result to a detail record, counters defaulted to 0 and
/// reactions carried through as opaque JSON.
pub fn message_detail(msg: &tl::enums::Message) -> Option<MessageDetail> {
    let m = match msg {
        tl::enums::Message::Message(m) => m,
        tl::enums::Message::Empty(_) | tl::enums::Message::Service(_) => return None,
    };

    Some(MessageDetail {
        id: m.id,
        timestamp: timestamp(m.date),
        text: non_empty(&m.message),
        views: m.views.unwrap_or(0),
        forwards: m.forwards.unwrap_or(0),
        has_media: m.media.is_some(),
        reactions: m.reactions.as_ref().map(reactions_json),
    })
}

/// Message id of any raw variant; used for the backward paging cursor.
pub fn raw_message_id(msg: &tl::enums::Message) -> i32 {
    match msg {
        tl::enums::Message::Message(m) => m.id,
        tl::enums::Message::Service(m) => m.id,
        tl::enums::Message::Empty(m) => m.id,
    }
}

fn timestamp(date: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(date as i64, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn peer_id(peer: &tl::enums::Peer) -> i64 {
    match peer {
        tl::enums::Peer::User(u) => u.user_id,
        tl::enums::Peer::Chat(c) => c.chat_id,
        tl::enums::Peer::Channel(c) => c.channel_id,
    }
}

fn reply_to_id(reply: &tl::enums::MessageReplyHeader) -> Option<i32> {
    match reply {
        tl::enums::MessageReplyHeader::Header(h) => h.reply_to_msg_id,
        _ => None,
    }
}

/// Flatten the reaction counters into `[{"emoticon"|"custom_emoji_id", "count"}]`.
/// The exact shape is owned by this adapter; callers treat it as opaque.
fn reactions_json(reactions: &tl::enums::MessageReactions) -> serde_json::Value {
    let tl::enums::MessageReactions::Reactions(r) = reactions;
    let counts: Vec<serde_json::Value> = r
        .results
        .iter()
        .map(|rc| {
            let tl::enums::ReactionCount::Count(rc) = rc;
            match &rc.reaction {
                tl::enums::Reaction::Emoji(e) => {
                    json!({"emoticon": e.emoticon, "count": rc.count})
                }
                tl::enums::Reaction::CustomEmoji(e) => {
                    json!({"custom_emoji_id": e.document_id, "count": rc.count})
                }
                _ => json!({"count": rc.count}),
            }
        })
        .collect();
    json!(counts)
}
