//! Classifying "now" against a day's courses.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use crate::course::CourseOccurrence;

/// Where the day stands at a given instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleState<'a> {
    /// The course in progress, if any.
    pub current: Option<CourseOccurrence<'a>>,
    /// The nearest course that has not started yet, if any.
    pub next: Option<CourseOccurrence<'a>>,
}

impl ScheduleState<'_> {
    /// Returns true when no course is in progress or upcoming.
    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.next.is_none()
    }
}

/// Resolves the current and next course at `now`.
///
/// Occurrences are scanned once in the order given, which is trusted to be
/// ascending by start and never re-sorted:
/// - an occurrence with `start < now < end` becomes `current` (a later one
///   overwrites an earlier one)
/// - the first occurrence with `start >= now` becomes `next` and ends the scan
/// - anything already over is skipped
pub fn resolve<'a>(now: DateTime<Utc>, occurrences: &[CourseOccurrence<'a>]) -> ScheduleState<'a> {
    let mut state = ScheduleState::default();

    for occurrence in occurrences {
        if occurrence.is_ongoing_at(now) {
            trace!(course = %occurrence.course.short_name, "Course in progress");
            state.current = Some(occurrence.clone());
        } else if occurrence.is_upcoming_at(now) {
            trace!(course = %occurrence.course.short_name, "Next course found");
            state.next = Some(occurrence.clone());
            break;
        }
    }

    state
}
