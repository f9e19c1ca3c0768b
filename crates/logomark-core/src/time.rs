use chrono::{DateTime, Local, Utc};

pub const MILLIS_PER_MINUTE: i64 = 60_000;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes.saturating_mul(MILLIS_PER_MINUTE)
}

pub fn format_timestamp_millis(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp_millis(ts)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Human readable age, e.g. `42s`, `7m`, `3h`.
pub fn format_age(now: i64, ts: i64) -> String {
    let secs = (now - ts).max(0) / 1000;
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86_400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86_400)
    }
}
