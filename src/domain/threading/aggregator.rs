//! Day aggregation and ranking of resolved threads.

use super::resolver::{ResolvedMessage, ThreadKey};
use crate::domain::{DaySummary, DayThread, ThreadMessage};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Minimum messages or distinct participants for a thread to count as a discussion.
pub const MIN_ACTIVITY: usize = 2;

/// A discussion assembled from resolved messages.
#[derive(Debug, Clone)]
pub struct Thread {
    pub key: ThreadKey,
    pub label: String,
    pub messages: Vec<ThreadMessage>,
    /// Sender ids seen in the thread. Unresolved senders count as participant `0`.
    pub participants: HashSet<i64>,
    /// Unix timestamp of the oldest message.
    pub earliest: i64,
}

impl Thread {
    fn new(key: ThreadKey, label: String, date: i64) -> Self {
        Self {
            key,
            label,
            messages: Vec::new(),
            participants: HashSet::new(),
            earliest: date,
        }
    }

    fn push(&mut self, msg: ThreadMessage) {
        self.participants.insert(msg.sender_id);
        self.earliest = self.earliest.min(msg.date);
        self.messages.push(msg);
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn user_count(&self) -> usize {
        self.participants.len()
    }

    /// Single-author, single-message threads are noise.
    pub fn is_active(&self) -> bool {
        self.message_count() >= MIN_ACTIVITY || self.user_count() >= MIN_ACTIVITY
    }

    fn to_day_thread(&self) -> DayThread {
        DayThread {
            topic: self.label.clone(),
            messages: self.message_count(),
            users: self.user_count(),
        }
    }
}

/// Fold resolved messages into threads, in order of first appearance.
/// The first message seen for a key fixes the thread label.
pub fn collect_threads(resolved: Vec<ResolvedMessage<'_>>) -> Vec<Thread> {
    let mut threads: Vec<Thread> = Vec::new();
    let mut index: HashMap<ThreadKey, usize> = HashMap::new();

    for r in resolved {
        let msg = r.message;
        let slot = *index.entry(r.key).or_insert_with(|| {
            threads.push(Thread::new(r.key, r.label, msg.date));
            threads.len() - 1
        });
        threads[slot].push(ThreadMessage {
            id: msg.id,
            text: msg.text.clone(),
            date: msg.date,
            sender_id: msg.sender_id,
        });
    }

    threads
}

/// Calendar date (YYYY-MM-DD) of a unix timestamp in `tz`.
pub fn day_key<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(tz)
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

/// Bucket threads by the day of their earliest message, drop inactive threads,
/// rank the rest and omit days left empty. Days come out in ascending order.
pub fn summarize_days<Tz: TimeZone>(threads: &[Thread], tz: &Tz) -> Vec<DaySummary> {
    let mut buckets: BTreeMap<String, Vec<&Thread>> = BTreeMap::new();
    for thread in threads {
        buckets
            .entry(day_key(thread.earliest, tz))
            .or_default()
            .push(thread);
    }

    buckets
        .into_iter()
        .filter_map(|(date, day_threads)| {
            let mut ranked: Vec<DayThread> = day_threads
                .into_iter()
                .filter(|t| t.is_active())
                .map(Thread::to_day_thread)
                .collect();
            if ranked.is_empty() {
                return None;
            }
            // Stable: fully tied threads keep first-seen order.
            ranked.sort_by(|a, b| {
                b.messages
                    .cmp(&a.messages)
                    .then_with(|| b.users.cmp(&a.users))
            });
            Some(DaySummary {
                date,
                threads: ranked,
            })
        })
        .collect()
}
