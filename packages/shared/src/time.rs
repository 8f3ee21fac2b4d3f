//! Wall-clock helpers.
//!
//! Timestamps travel through the system as Unix milliseconds; only the HTTP
//! inspection API renders them as RFC 3339 (JST, matching the rest of the
//! operator tooling).

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Current Unix time in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// The instant `timeout` before `now_ms`, saturating at the epoch.
pub fn cutoff_millis(now_ms: i64, timeout: Duration) -> i64 {
    let timeout_ms = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_sub(timeout_ms).max(0)
}

/// Render Unix milliseconds as an RFC 3339 string in JST.
///
/// Out-of-range values fall back to the raw millisecond count.
pub fn millis_to_jst_rfc3339(millis: i64) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return millis.to_string();
    };
    match FixedOffset::east_opt(JST_OFFSET_SECS) {
        Some(jst) => utc.with_timezone(&jst).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}
