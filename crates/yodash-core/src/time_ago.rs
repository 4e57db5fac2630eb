//! Coarse relative-age labels for history rows.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Formats the age of `timestamp` relative to `now`.
///
/// Bands: seconds below a minute, minutes below an hour, hours below a
/// day, days otherwise. Timestamps in the future read as `0s ago`.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds().max(0);

    if diff < MINUTE {
        format!("{diff}s ago")
    } else if diff < HOUR {
        format!("{}m ago", diff / MINUTE)
    } else if diff < DAY {
        format!("{}h ago", diff / HOUR)
    } else {
        format!("{}d ago", diff / DAY)
    }
}

/// Parses an RFC 3339 timestamp and formats its age. Unparseable input renders `unknown`.
pub fn time_ago_str(timestamp: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => time_ago(parsed.with_timezone(&Utc), now),
        Err(err) => {
            tracing::debug!("[TimeAgo] Unparseable timestamp {:?}: {}", timestamp, err);
            "unknown".to_string()
        }
    }
}
