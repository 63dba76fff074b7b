//! Human-readable previews used as thread labels.

use crate::domain::{MediaKind, Message};

/// Maximum preview length in characters (before the ellipsis).
pub const MAX_PREVIEW_CHARS: usize = 1000;

const ELLIPSIS: &str = "...";

/// Label for a message: cleaned text, else a media tag, else a placeholder.
pub fn message_preview(msg: &Message) -> String {
    if !msg.text.trim().is_empty() {
        return truncate_text(&msg.text, MAX_PREVIEW_CHARS);
    }
    match msg.media {
        Some(kind) => media_tag(kind).to_string(),
        None => "Message".to_string(),
    }
}

/// Label for a forum-topic message: its own text, else `Topic <id>`.
pub fn topic_label(msg: &Message, topic: &str) -> String {
    if !msg.text.trim().is_empty() {
        return truncate_text(&msg.text, MAX_PREVIEW_CHARS);
    }
    format!("Topic {}", topic)
}

pub fn media_tag(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Photo => "📷 Photo",
        MediaKind::Document => "📄 Document",
        MediaKind::Video => "🎥 Video",
        MediaKind::Other => "📎 Media",
    }
}

/// Replace line breaks with spaces, trim, and cut to `max_chars` characters
/// (appending `...` when something was cut).
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    let cleaned = cleaned.trim();
    match cleaned.char_indices().nth(max_chars) {
        None => cleaned.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len());
            out.push_str(&cleaned[..cut]);
            out.push_str(ELLIPSIS);
            out
        }
    }
}
