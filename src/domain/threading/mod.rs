//! Discussion detection: resolve every message to a thread, then bucket and rank threads by day.
//!
//! Pure and synchronous. Each call builds its state from the batch and drops it on return.

pub mod aggregator;
pub mod preview;
pub mod resolver;

pub use aggregator::{Thread, collect_threads, summarize_days};
pub use resolver::{ResolvedMessage, RootResolver, ThreadKey, resolve_threads};

use crate::domain::{AnalysisResult, Message};
use chrono::TimeZone;

/// Summarize a batch of messages into ranked, day-bucketed active discussions.
///
/// `tz` decides calendar-day boundaries; `timezone_label` is reported as-is.
pub fn analyze_messages<Tz: TimeZone>(
    messages: &[Message],
    tz: &Tz,
    timezone_label: &str,
) -> AnalysisResult {
    if messages.is_empty() {
        return AnalysisResult::empty(timezone_label);
    }

    let threads = collect_threads(resolve_threads(messages));
    AnalysisResult {
        timezone: timezone_label.to_string(),
        days: summarize_days(&threads, tz),
    }
}
