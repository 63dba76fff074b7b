//! Map Grammers types to domain entities.
//!
//! Extracts Chat and analysis Message from grammers_client tl types.

use crate::domain::{Chat, ChatType, HistoryPage, MediaKind, Message};
use grammers_client::peer::Peer;
use grammers_client::tl;

/// Map a grammers Peer to domain ChatType.
///
/// * `Peer::User` → Private (DM).
/// * `Peer::Group` → Group or Supergroup (Supergroup when megagroup).
/// * `Peer::Channel` → Channel (broadcast).
pub fn chat_type_from_peer(peer: &Peer) -> ChatType {
    match peer {
        Peer::User(_) => ChatType::Private,
        Peer::Group(g) => {
            if g.is_megagroup() {
                ChatType::Supergroup
            } else {
                ChatType::Group
            }
        }
        Peer::Channel(_) => ChatType::Channel,
    }
}

/// Build domain Chat from a resolved peer.
pub fn chat_from_peer(peer: &Peer) -> Chat {
    Chat {
        id: peer.id().bot_api_dialog_id(),
        title: peer
            .name()
            .map(String::from)
            .unwrap_or_else(|| peer.id().to_string()),
        username: peer.username().map(String::from),
        kind: chat_type_from_peer(peer),
    }
}

/// Map a raw history page. Raw size and cursor count every message,
/// including the ones [`message_to_domain`] skips.
pub fn history_page(raw: &[tl::enums::Message]) -> HistoryPage {
    HistoryPage {
        messages: raw.iter().filter_map(message_to_domain).collect(),
        raw_len: raw.len(),
        next_offset: raw.iter().map(raw_message_id).min(),
    }
}

fn raw_message_id(msg: &tl::enums::Message) -> i32 {
    match msg {
        tl::enums::Message::Message(m) => m.id,
        tl::enums::Message::Service(m) => m.id,
        tl::enums::Message::Empty(m) => m.id,
    }
}

/// Map a raw history message to a domain Message.
///
/// Empty and service messages (joins, pins, topic creation) are skipped.
pub fn message_to_domain(msg: &tl::enums::Message) -> Option<Message> {
    let m = match msg {
        tl::enums::Message::Message(m) => m,
        tl::enums::Message::Empty(_) | tl::enums::Message::Service(_) => return None,
    };

    let (reply_to, forum_topic, topic_id) = match m.reply_to.as_ref() {
        Some(tl::enums::MessageReplyHeader::Header(h)) => {
            reply_fields(h.forum_topic, h.reply_to_msg_id, h.reply_to_top_id)
        }
        _ => (None, false, None),
    };

    Some(Message {
        id: m.id,
        // Original send date: edits must not move a message to another day.
        date: m.date as i64,
        sender_id: sender_id(m.from_id.as_ref()),
        text: m.message.clone(),
        media: m.media.as_ref().map(media_kind),
        reply_to,
        forum_topic,
        topic_id,
    })
}

/// `(reply_to, forum_topic, topic_id)` from a reply header.
///
/// A direct reply to the topic's first message carries no top id;
/// the replied message id is then the topic id.
fn reply_fields(
    forum_topic: bool,
    reply_to_msg_id: Option<i32>,
    reply_to_top_id: Option<i32>,
) -> (Option<i32>, bool, Option<i32>) {
    let topic_id = if forum_topic {
        reply_to_top_id.or(reply_to_msg_id)
    } else {
        None
    };
    (reply_to_msg_id, forum_topic, topic_id)
}

/// User or channel id of the author; 0 when Telegram does not expose one.
fn sender_id(from: Option<&tl::enums::Peer>) -> i64 {
    match from {
        Some(tl::enums::Peer::User(u)) => u.user_id,
        Some(tl::enums::Peer::Channel(c)) => c.channel_id,
        Some(tl::enums::Peer::Chat(c)) => c.chat_id,
        None => 0,
    }
}

fn media_kind(media: &tl::enums::MessageMedia) -> MediaKind {
    match media {
        tl::enums::MessageMedia::Photo(_) => MediaKind::Photo,
        tl::enums::MessageMedia::Document(d) => match d.document.as_ref() {
            Some(tl::enums::Document::Document(doc)) => document_kind(&doc.mime_type),
            _ => MediaKind::Document,
        },
        _ => MediaKind::Other,
    }
}

fn document_kind(mime_type: &str) -> MediaKind {
    if mime_type.starts_with("video/") {
        MediaKind::Video
    } else {
        MediaKind::Document
    }
}
