//! Matching calendar occurrences against the course catalog.
//!
//! The catalog, not the calendar, decides what counts as a course: events
//! with an unknown summary are reported and dropped.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::course::{CourseCatalog, CourseOccurrence, EventOccurrence};

/// A non-fatal problem found while matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchWarning {
    /// No course in the catalog has this summary.
    Unmatched {
        /// The event summary.
        summary: String,
    },
    /// The occurrence matched a course but does not end after it starts.
    DegenerateSpan {
        /// The event summary.
        summary: String,
        /// Start of the occurrence.
        start: DateTime<Utc>,
        /// End of the occurrence.
        end: DateTime<Utc>,
    },
}

impl fmt::Display for MatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmatched { summary } => write!(f, "{} not found", summary),
            Self::DegenerateSpan {
                summary,
                start,
                end,
            } => write!(
                f,
                "{} ignored: does not end after it starts ({} to {})",
                summary,
                start.to_rfc3339(),
                end.to_rfc3339()
            ),
        }
    }
}

/// The result of matching a day's occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome<'a> {
    /// Matched courses, in input order.
    pub courses: Vec<CourseOccurrence<'a>>,
    /// Problems encountered, in input order.
    pub warnings: Vec<MatchWarning>,
}

/// Resolves each occurrence to its course definition.
///
/// Input order is preserved and at most one course occurrence is produced per
/// event occurrence.
pub fn match_courses<'a>(
    occurrences: &[EventOccurrence],
    catalog: &'a CourseCatalog,
) -> MatchOutcome<'a> {
    let mut outcome = MatchOutcome::default();

    for event in occurrences {
        let Some(course) = catalog.find(&event.summary) else {
            debug!(summary = %event.summary, "No course matches event");
            outcome.warnings.push(MatchWarning::Unmatched {
                summary: event.summary.clone(),
            });
            continue;
        };

        if event.end <= event.start {
            debug!(
                summary = %event.summary,
                start = %event.start,
                end = %event.end,
                "Skipping occurrence with non-positive duration"
            );
            outcome.warnings.push(MatchWarning::DegenerateSpan {
                summary: event.summary.clone(),
                start: event.start,
                end: event.end,
            });
            continue;
        }

        outcome
            .courses
            .push(CourseOccurrence::from_event(course, event));
    }

    debug!(
        events = occurrences.len(),
        matched = outcome.courses.len(),
        "Matched occurrences against catalog"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::CourseDefinition;
    use chrono::TimeZone;

    fn utc(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 13, h, min, 0).unwrap()
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(vec![
            CourseDefinition::new("CS101", "Intro CS", "CS"),
            CourseDefinition::new("MATH201", "Calc I", "MATH"),
        ])
    }

    #[test]
    fn matches_known_courses_in_order() {
        let catalog = catalog();
        let events = vec![
            EventOccurrence::new(utc(9, 0), utc(10, 0), "CS101", "A1"),
            EventOccurrence::new(utc(10, 20), utc(11, 0), "MATH201", "B2"),
        ];

        let outcome = match_courses(&events, &catalog);

        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.courses.len(), 2);
        assert_eq!(outcome.courses[0].course.short_name, "CS");
        assert_eq!(outcome.courses[0].location, "A1");
        assert_eq!(outcome.courses[1].course.short_name, "MATH");
        assert_eq!(outcome.courses[1].start, utc(10, 20));
    }

    #[test]
    fn unmatched_summary_is_warned_and_skipped() {
        let catalog = catalog();
        let events = vec![
            EventOccurrence::new(utc(8, 0), utc(9, 0), "Lunch", "Mensa"),
            EventOccurrence::new(utc(9, 0), utc(10, 0), "CS101", "A1"),
        ];

        let outcome = match_courses(&events, &catalog);

        assert_eq!(outcome.courses.len(), 1);
        assert_eq!(
            outcome.warnings,
            vec![MatchWarning::Unmatched {
                summary: "Lunch".to_string()
            }]
        );
        assert_eq!(outcome.warnings[0].to_string(), "Lunch not found");
    }

    #[test]
    fn degenerate_span_is_skipped() {
        let catalog = catalog();
        let events = vec![
            EventOccurrence::new(utc(9, 0), utc(9, 0), "CS101", "A1"),
            EventOccurrence::new(utc(11, 0), utc(10, 0), "MATH201", "B2"),
        ];

        let outcome = match_courses(&events, &catalog);

        assert!(outcome.courses.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
        assert!(matches!(
            outcome.warnings[1],
            MatchWarning::DegenerateSpan { ref summary, .. } if summary == "MATH201"
        ));
    }

    #[test]
    fn degenerate_span_message_covers_empty_spans() {
        let catalog = catalog();
        let events = vec![EventOccurrence::new(utc(9, 0), utc(9, 0), "CS101", "A1")];

        let outcome = match_courses(&events, &catalog);

        assert_eq!(
            outcome.warnings[0].to_string(),
            "CS101 ignored: does not end after it starts \
             (2025-10-13T09:00:00+00:00 to 2025-10-13T09:00:00+00:00)"
        );
    }

    #[test]
    fn never_grows_and_keeps_relative_order() {
        let catalog = catalog();
        let summaries = ["MATH201", "x", "CS101", "y", "MATH201", "CS101"];
        let events: Vec<_> = summaries
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let start = utc(8 + i as u32, 0);
                EventOccurrence::new(start, start + chrono::Duration::minutes(45), *s, "R")
            })
            .collect();

        let outcome = match_courses(&events, &catalog);

        assert!(outcome.courses.len() <= events.len());
        let order: Vec<_> = outcome
            .courses
            .iter()
            .map(|c| c.course.event_summary.as_str())
            .collect();
        assert_eq!(order, vec!["MATH201", "CS101", "MATH201", "CS101"]);
        assert!(outcome.courses.windows(2).all(|w| w[0].start < w[1].start));
    }

    #[test]
    fn empty_inputs() {
        let empty = CourseCatalog::default();
        let events = vec![EventOccurrence::new(utc(9, 0), utc(10, 0), "CS101", "A1")];

        let outcome = match_courses(&events, &empty);
        assert!(outcome.courses.is_empty());
        assert_eq!(outcome.warnings.len(), 1);

        let catalog = catalog();
        let outcome = match_courses(&[], &catalog);
        assert_eq!(outcome, MatchOutcome::default());
    }

    #[test]
    fn warning_serializes_with_kind() {
        let warning = MatchWarning::Unmatched {
            summary: "Lunch".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert_eq!(json, r#"{"kind":"unmatched","summary":"Lunch"}"#);
    }
}
