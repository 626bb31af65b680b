//! Human-readable time spans.
//!
//! Every span shown to the user (time remaining, time until the next course,
//! break length) goes through [`format_span`].

use chrono::{DateTime, TimeDelta, Utc};

/// Spans of more than this many hours drop the minute remainder.
const MAX_HOURS_WITH_MINUTES: i64 = 5;

/// Formats the span between two instants.
///
/// The span is rounded up to whole minutes:
/// - `1` minute → `"1 minute"`
/// - under an hour → `"{m}min"` (so an empty span is `"0min"`)
/// - whole hours, or more than five hours → `"{h}h"`
/// - otherwise → `"{h}:{mm}h"`
///
/// A negative span is clamped to zero.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use usw_core::format_span;
///
/// let begin = Utc.with_ymd_and_hms(2025, 10, 13, 9, 0, 0).unwrap();
/// assert_eq!(format_span(begin, begin + Duration::minutes(125)), "2:05h");
/// ```
pub fn format_span(begin: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format_minutes(ceil_minutes(begin, end))
}

/// Returns the span in minutes, rounded up and clamped at zero.
///
/// Any sub-minute remainder, down to a nanosecond, counts as a minute.
pub fn ceil_minutes(begin: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let span = (end - begin).max(TimeDelta::zero());
    let whole = span.num_minutes();
    let rest = span - TimeDelta::minutes(whole);
    if rest > TimeDelta::zero() {
        whole + 1
    } else {
        whole
    }
}

/// Formats a whole number of minutes.
pub fn format_minutes(minutes: i64) -> String {
    if minutes == 1 {
        return "1 minute".to_string();
    }

    if minutes < 60 {
        return format!("{}min", minutes);
    }

    let hours = minutes / 60;
    let rest = minutes % 60;

    if hours > MAX_HOURS_WITH_MINUTES || rest == 0 {
        format!("{}h", hours)
    } else {
        format!("{}:{:02}h", hours, rest)
    }
}
