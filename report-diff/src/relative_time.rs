//! Human-relative timestamps ("3 hours ago")

use chrono::{DateTime, TimeZone};

/// Calendar buckets in seconds, largest first
const UNITS: [(&str, i64); 6] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Describe how long ago `then` was relative to `now`.
///
/// The largest unit whose threshold is met is chosen and the count is rounded
/// down. Anything under a second, or in the future, is "just now".
pub fn time_ago<A: TimeZone, B: TimeZone>(then: &DateTime<A>, now: &DateTime<B>) -> String {
    let elapsed = now.timestamp() - then.timestamp();

    UNITS
        .iter()
        .find(|(_, seconds)| elapsed >= *seconds)
        .map(|(unit, seconds)| {
            let count = elapsed / seconds;
            let plural = if count == 1 { "" } else { "s" };
            format!("{count} {unit}{plural} ago")
        })
        .unwrap_or_else(|| "just now".to_string())
}
