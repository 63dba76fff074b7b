//! Retrieval window: the trailing span of complete calendar days to analyse.

use chrono::{DateTime, Days, TimeZone};

/// Unix timestamp of local midnight `days` days before `now`.
///
/// Falls back to `now - days * 24h` when that midnight does not exist (DST gap).
pub fn window_start<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> i64 {
    let tz = now.timezone();
    let fallback = now.timestamp() - i64::from(days) * 86_400;
    now.date_naive()
        .checked_sub_days(Days::new(u64::from(days)))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|start| start.timestamp())
        .unwrap_or(fallback)
}
