//! Status line rendering.
//!
//! This module turns a [`ScheduleState`] into the one-line summary printed by
//! the CLI, and into [`JsonStatus`] for machine consumption.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use usw_core::{compose, resolve, CourseDefinition, CourseOccurrence, EventOccurrence};
//!
//! let cs = CourseDefinition::new("CS101", "Intro CS", "CS");
//! let event = EventOccurrence::new(
//!     Utc.with_ymd_and_hms(2025, 10, 13, 9, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2025, 10, 13, 10, 0, 0).unwrap(),
//!     "CS101",
//!     "A1",
//! );
//! let day = [CourseOccurrence::from_event(&cs, &event)];
//! let now = Utc.with_ymd_and_hms(2025, 10, 13, 9, 30, 0).unwrap();
//!
//! assert_eq!(compose(now, &resolve(now, &day)), "CS ends in 30min!");
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::course::CourseOccurrence;
use crate::duration::format_span;
use crate::matcher::MatchWarning;
use crate::schedule::ScheduleState;


/// Breaks longer than this get the detailed "after X break" phrasing.
pub const SHORT_BREAK_THRESHOLD_MINUTES: i64 = 15;

/// Message shown once every course of the day is over.
pub const FINISHED_TEXT: &str = "finished for the day";

/// Returns the break between two courses, clamped at zero.
pub fn break_between(current: &CourseOccurrence<'_>, next: &CourseOccurrence<'_>) -> Duration {
    (next.start - current.end).max(Duration::zero())
}

/// Returns true if the break is long enough for the detailed phrasing.
pub fn is_long_break(gap: Duration) -> bool {
    gap > Duration::minutes(SHORT_BREAK_THRESHOLD_MINUTES)
}

/// Renders the status line for `now`.
pub fn compose(now: DateTime<Utc>, state: &ScheduleState<'_>) -> String {
    match (&state.current, &state.next) {
        (Some(current), None) => format!(
            "{} ends in {}!",
            current.course.short_name,
            format_span(now, current.end)
        ),
        (Some(current), Some(next)) => {
            if is_long_break(break_between(current, next)) {
                format!(
                    "{} ends in {}. Next: {} in {} after {} break.",
                    current.course.short_name,
                    format_span(now, current.end),
                    next.course.display_name,
                    next.location,
                    format_span(current.end, next.start)
                )
            } else {
                // The room shown here is the current one, not the next one.
                format!(
                    "{} Ends in {} minutes. Next: {} in {}",
                    current.course.short_name,
                    format_span(now, current.end),
                    next.course.display_name,
                    current.location
                )
            }
        }
        (None, Some(next)) => format!(
            "{} in {}. in {}",
            next.course.display_name,
            format_span(now, next.start),
            next.location
        ),
        (None, None) => FINISHED_TEXT.to_string(),
    }
}

/// JSON output for machine consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonStatus {
    /// The rendered status line.
    pub message: String,
    /// The course in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<JsonCourse>,
    /// The next course.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<JsonCourse>,
    /// Minutes between the current and the next course (clamped at zero).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<i64>,
    /// Warnings raised while matching.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A course in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCourse {
    /// Full course name.
    pub name: String,
    /// Course abbreviation.
    pub short_name: String,
    /// Room.
    pub location: String,
    /// Start time in RFC 3339 format.
    pub start_time: String,
    /// End time in RFC 3339 format.
    pub end_time: String,
}

impl From<&CourseOccurrence<'_>> for JsonCourse {
    fn from(occurrence: &CourseOccurrence<'_>) -> Self {
        Self {
            name: occurrence.course.display_name.clone(),
            short_name: occurrence.course.short_name.clone(),
            location: occurrence.location.clone(),
            start_time: occurrence.start.to_rfc3339(),
            end_time: occurrence.end.to_rfc3339(),
        }
    }
}

impl JsonStatus {
    /// Builds the JSON output for a resolved state.
    pub fn new(now: DateTime<Utc>, state: &ScheduleState<'_>, warnings: &[MatchWarning]) -> Self {
        let break_minutes = match (&state.current, &state.next) {
            (Some(current), Some(next)) => Some(break_between(current, next).num_minutes()),
            _ => None,
        };

        Self {
            message: compose(now, state),
            current: state.current.as_ref().map(JsonCourse::from),
            next: state.next.as_ref().map(JsonCourse::from),
            break_minutes,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        }
    }
}
