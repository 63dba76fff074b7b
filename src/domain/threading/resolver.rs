//! Thread resolution: decide which discussion every message belongs to.
//!
//! Rules, first match wins:
//! 1. forum-topic messages → `topic_<id>` (or `topic_general`)
//! 2. members of an in-batch reply chain (replies whose target is in the batch,
//!    and the chain root itself) → `reply_<root id>`
//! 3. replies pointing outside the batch → `reply_<target id>`
//! 4. everything else → `msg_<id>`

use super::preview::{message_preview, topic_label};
use crate::domain::Message;
use std::collections::{HashMap, HashSet};
use std::fmt;

const GENERAL_TOPIC: &str = "general";

/// Stable identity of a discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadKey {
    /// Forum topic; `None` is the general topic.
    Topic(Option<i32>),
    /// Reply chain, keyed by its root (or by an out-of-batch reply target).
    Reply(i32),
    /// Standalone message.
    Single(i32),
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadKey::Topic(Some(id)) => write!(f, "topic_{}", id),
            ThreadKey::Topic(None) => write!(f, "topic_{}", GENERAL_TOPIC),
            ThreadKey::Reply(id) => write!(f, "reply_{}", id),
            ThreadKey::Single(id) => write!(f, "msg_{}", id),
        }
    }
}

/// A message together with its thread assignment.
#[derive(Debug, Clone)]
pub struct ResolvedMessage<'a> {
    pub message: &'a Message,
    pub key: ThreadKey,
    pub label: String,
}

/// Resolve every message of the batch. Output preserves batch order.
pub fn resolve_threads(messages: &[Message]) -> Vec<ResolvedMessage<'_>> {
    let mut roots = RootResolver::new(messages);
    messages
        .iter()
        .map(|msg| {
            let (key, label) = roots.classify(msg);
            ResolvedMessage {
                message: msg,
                key,
                label,
            }
        })
        .collect()
}

/// Reply-chain root lookup over an id-indexed table of the batch.
///
/// Roots are memoized batch-wide, so resolving every link of a chain of length N
/// costs O(N) in total.
pub struct RootResolver<'a> {
    by_id: HashMap<i32, &'a Message>,
    /// Ids that some non-topic message of the batch replies to.
    replied: HashSet<i32>,
    roots: HashMap<i32, i32>,
}

impl<'a> RootResolver<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        let by_id: HashMap<i32, &'a Message> = messages.iter().map(|m| (m.id, m)).collect();
        let replied = messages
            .iter()
            .filter(|m| !m.forum_topic)
            .filter_map(|m| m.reply_to)
            .filter(|target| by_id.contains_key(target))
            .collect();
        Self {
            by_id,
            replied,
            roots: HashMap::new(),
        }
    }

    /// Assign `(key, label)` to a single message of the batch.
    pub fn classify(&mut self, msg: &Message) -> (ThreadKey, String) {
        if msg.forum_topic {
            let topic = msg
                .topic_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| GENERAL_TOPIC.to_string());
            return (ThreadKey::Topic(msg.topic_id), topic_label(msg, &topic));
        }

        let in_chain = msg
            .reply_to
            .is_some_and(|target| self.by_id.contains_key(&target))
            || self.replied.contains(&msg.id);
        if in_chain {
            let root = self.root_of(msg.id);
            let label = match self.by_id.get(&root) {
                Some(root_msg) => message_preview(root_msg),
                None => message_preview(msg),
            };
            return (ThreadKey::Reply(root), label);
        }

        match msg.reply_to {
            Some(target) => (ThreadKey::Reply(target), message_preview(msg)),
            None => (ThreadKey::Single(msg.id), message_preview(msg)),
        }
    }

    /// Follow `reply_to` links from `start` while the target is in the batch.
    ///
    /// A cycle stops the walk; every message on or leading into it gets the
    /// smallest id of the cycle as root, whatever the starting point.
    pub fn root_of(&mut self, start: i32) -> i32 {
        if let Some(&root) = self.roots.get(&start) {
            return root;
        }

        let mut path: Vec<i32> = Vec::new();
        let mut visited: HashMap<i32, usize> = HashMap::new();
        let mut current = start;

        let root = loop {
            if let Some(&root) = self.roots.get(&current) {
                break root;
            }
            if let Some(&pos) = visited.get(&current) {
                break path[pos..].iter().copied().min().unwrap_or(current);
            }
            visited.insert(current, path.len());
            path.push(current);

            match self.by_id.get(&current).and_then(|m| m.reply_to) {
                Some(target) if self.by_id.contains_key(&target) => current = target,
                _ => break current,
            }
        };

        for id in path {
            self.roots.insert(id, root);
        }
        root
    }
}
