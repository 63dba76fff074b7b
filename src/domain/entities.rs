//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram or IO types here. Adapters map into these.

use serde::{Deserialize, Serialize};

/// Report timezone label attached to every analysis result.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tashkent";

/// Represents a Telegram chat (user, group, or channel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub title: String,
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub kind: ChatType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    /// Groups and supergroups are the only chats with discussions worth analysing.
    pub fn is_group(self) -> bool {
        matches!(self, ChatType::Group | ChatType::Supergroup)
    }
}

/// A single message from a group, as fetched for analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    /// Unix timestamp (seconds) of the original send.
    pub date: i64,
    /// Author (user or channel). 0 when the sender cannot be resolved.
    pub sender_id: i64,
    /// Empty when the message carries no text.
    pub text: String,
    pub media: Option<MediaKind>,
    pub reply_to: Option<i32>,
    /// True when the message lives in a forum sub-topic.
    pub forum_topic: bool,
    /// Topic id; `None` with `forum_topic` set means the "general" topic.
    pub topic_id: Option<i32>,
}

/// Kind of non-text content attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Document,
    Video,
    Other,
}

/// One page of history as returned by Telegram.
///
/// `messages` holds only the mappable messages; `raw_len` and `next_offset`
/// describe the raw page, service and empty messages included.
#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    /// Number of messages Telegram returned, before mapping.
    pub raw_len: usize,
    /// Smallest raw message id on the page; the cursor for the next request.
    pub next_offset: Option<i32>,
}

impl HistoryPage {
    pub fn is_exhausted(&self) -> bool {
        self.raw_len == 0
    }
}

/// One message as recorded inside a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    pub id: i32,
    pub text: String,
    pub date: i64,
    pub sender_id: i64,
}

/// A single thread entry of a day summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayThread {
    pub topic: String,
    pub messages: usize,
    pub users: usize,
}

/// Active discussions whose earliest message falls on `date` (YYYY-MM-DD).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    pub threads: Vec<DayThread>,
}

/// Output of one group analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub timezone: String,
    pub days: Vec<DaySummary>,
}

impl AnalysisResult {
    pub fn empty(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
            days: Vec::new(),
        }
    }

    pub fn total_threads(&self) -> usize {
        self.days.iter().map(|d| d.threads.len()).sum()
    }
}

/// Result of submitting a login code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    Success,
    /// Account has 2FA enabled; `check_password` must follow.
    PasswordRequired { hint: Option<String> },
}
