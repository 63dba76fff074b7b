//! End-to-end properties of the discussion engine on in-memory batches.

use chrono::Utc;
use tg_digest::domain::threading::{collect_threads, resolve_threads};
use tg_digest::domain::{AnalysisResult, Message, analyze_messages};

// 2025-10-13 00:00:00 UTC
const MONDAY: i64 = 1_760_313_600;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

fn msg(id: i32, date: i64, sender_id: i64, reply_to: Option<i32>) -> Message {
    Message {
        id,
        date,
        sender_id,
        text: format!("message {}", id),
        reply_to,
        ..Default::default()
    }
}

fn topic(id: i32, date: i64, sender_id: i64, topic_id: i32) -> Message {
    Message {
        forum_topic: true,
        topic_id: Some(topic_id),
        text: format!("topic {} post {}", topic_id, id),
        ..msg(id, date, sender_id, Some(topic_id))
    }
}

fn analyze(batch: &[Message]) -> AnalysisResult {
    analyze_messages(batch, &Utc, "Asia/Tashkent")
}

/// A week of mixed traffic: chains, topics, singletons, dangling replies, a cycle.
fn mixed_batch() -> Vec<Message> {
    let mut batch = Vec::new();
    let mut id = 1000;
    for day in 0..7 {
        let base = MONDAY + day * DAY;
        // reply chain of 4 from 2 users
        let root = id;
        batch.push(msg(root, base + HOUR, 1, None));
        for k in 1..4 {
            batch.push(msg(root + k, base + HOUR + k as i64 * 60, 1 + (k as i64 % 2), Some(root + k - 1)));
        }
        id += 10;
        // forum topic posts
        for k in 0..(day as i32 % 3 + 1) {
            batch.push(topic(id + k, base + 2 * HOUR, 10 + k as i64, 77));
        }
        id += 10;
        // singleton and dangling reply
        batch.push(msg(id, base + 3 * HOUR, 5, None));
        batch.push(msg(id + 1, base + 3 * HOUR, 6, Some(1)));
        id += 10;
    }
    batch.push(msg(1, MONDAY + 5 * HOUR, 7, Some(2)));
    batch.push(msg(2, MONDAY + 6 * HOUR, 8, Some(1)));
    batch
}

#[test]
fn empty_batch_yields_no_days() {
    let result = analyze(&[]);
    assert_eq!(result.timezone, "Asia/Tashkent");
    assert!(result.days.is_empty());
}

#[test]
fn reply_chain_of_three_single_author_is_emitted() {
    let batch = vec![
        msg(1, MONDAY + HOUR, 42, None),
        msg(2, MONDAY + 2 * HOUR, 42, Some(1)),
        msg(3, MONDAY + 3 * HOUR, 42, Some(2)),
    ];
    let result = analyze(&batch);
    assert_eq!(result.days.len(), 1);
    let threads = &result.days[0].threads;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].messages, 3);
    assert_eq!(threads[0].users, 1);
    assert_eq!(threads[0].topic, "message 1");

    let keys: Vec<String> = resolve_threads(&batch)
        .iter()
        .map(|r| r.key.to_string())
        .collect();
    assert_eq!(keys, vec!["reply_1"; 3]);
}

#[test]
fn five_singletons_produce_no_day() {
    let batch: Vec<Message> = (1..=5).map(|i| msg(i, MONDAY + i as i64, i as i64, None)).collect();
    assert!(analyze(&batch).days.is_empty());
}

#[test]
fn topic_ties_broken_by_users() {
    let mut batch = Vec::new();
    // T2: 10 messages, 2 users
    for i in 0..10 {
        batch.push(topic(100 + i, MONDAY + HOUR, 1 + (i as i64 % 2), 2));
    }
    // T1: 10 messages, 4 users
    for i in 0..10 {
        batch.push(topic(200 + i, MONDAY + 2 * HOUR, 10 + (i as i64 % 4), 1));
    }
    let result = analyze(&batch);
    let threads = &result.days[0].threads;
    assert_eq!(threads.len(), 2);
    assert_eq!((threads[0].messages, threads[0].users), (10, 4));
    assert_eq!((threads[1].messages, threads[1].users), (10, 2));
    assert_eq!(threads[0].topic, "topic 1 post 200");
}

#[test]
fn forum_topic_wins_over_reply() {
    let batch = vec![msg(1, MONDAY, 1, None), topic(2, MONDAY, 2, 99)];
    let resolved = resolve_threads(&batch);
    assert_eq!(resolved[1].key.to_string(), "topic_99");
}

#[test]
fn two_cycle_terminates_deterministically() {
    let forward = vec![msg(10, MONDAY, 1, Some(11)), msg(11, MONDAY, 2, Some(10))];
    let mut backward = forward.clone();
    backward.reverse();

    let a = analyze(&forward);
    let b = analyze(&backward);
    assert_eq!(a.days[0].threads.len(), 1);
    assert_eq!(a.days[0].threads[0].messages, 2);
    assert_eq!(a.days[0].threads[0].messages, b.days[0].threads[0].messages);
    assert_eq!(a.days[0].threads[0].users, b.days[0].threads[0].users);
}

#[test]
fn rerun_is_identical() {
    let batch = mixed_batch();
    assert_eq!(analyze(&batch), analyze(&batch));
}

#[test]
fn every_message_lands_in_exactly_one_thread() {
    let batch = mixed_batch();
    let threads = collect_threads(resolve_threads(&batch));
    let total: usize = threads.iter().map(|t| t.message_count()).sum();
    assert_eq!(total, batch.len());

    let mut ids: Vec<i32> = threads
        .iter()
        .flat_map(|t| t.messages.iter().map(|m| m.id))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), batch.len());

    for t in &threads {
        let min = t.messages.iter().map(|m| m.date).min().unwrap();
        assert_eq!(t.earliest, min);
    }
}

#[test]
fn emitted_threads_pass_filter_and_are_sorted() {
    let result = analyze(&mixed_batch());
    assert!(!result.days.is_empty());

    let dates: Vec<&str> = result.days.iter().map(|d| d.date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable();
    assert_eq!(dates, sorted);

    for day in &result.days {
        assert!(!day.threads.is_empty());
        for t in &day.threads {
            assert!(t.messages >= 2 || t.users >= 2);
            assert!(t.messages >= 1 && t.users >= 1);
        }
        for pair in day.threads.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.messages > b.messages || (a.messages == b.messages && a.users >= b.users));
        }
    }
}

#[test]
fn dropped_threads_fail_both_conditions() {
    let batch = mixed_batch();
    let threads = collect_threads(resolve_threads(&batch));
    let emitted: usize = analyze(&batch).days.iter().map(|d| d.threads.len()).sum();
    let dropped: Vec<_> = threads.iter().filter(|t| !t.is_active()).collect();

    assert_eq!(emitted + dropped.len(), threads.len());
    for t in dropped {
        assert!(t.message_count() < 2 && t.user_count() < 2);
    }
}
