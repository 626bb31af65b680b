//! Course and occurrence types.
//!
//! This module provides the data model of the schedule engine:
//! - [`CourseDefinition`]: a configured course, keyed by calendar summary
//! - [`CourseCatalog`]: the ordered set of known courses
//! - [`EventOccurrence`]: a concrete calendar event for today
//! - [`CourseOccurrence`]: an event occurrence resolved to its course

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A course from the configuration.
///
/// Definitions are immutable once loaded. Per-day data (times, room) lives in
/// [`CourseOccurrence`], never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDefinition {
    /// The calendar event summary this course matches (exact equality).
    #[serde(rename = "event-name")]
    pub event_summary: String,
    /// Full course name, used when announcing the next course.
    #[serde(rename = "course-name")]
    pub display_name: String,
    /// Abbreviation, used while the course is in progress.
    #[serde(rename = "short-name")]
    pub short_name: String,
}

impl CourseDefinition {
    /// Creates a new course definition.
    pub fn new(
        event_summary: impl Into<String>,
        display_name: impl Into<String>,
        short_name: impl Into<String>,
    ) -> Self {
        Self {
            event_summary: event_summary.into(),
            display_name: display_name.into(),
            short_name: short_name.into(),
        }
    }

    /// Returns true if this course matches the given event summary.
    pub fn matches(&self, summary: &str) -> bool {
        self.event_summary == summary
    }
}

/// The set of known courses.
///
/// Lookup is by exact summary; when two definitions share a key the first
/// one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: Vec<CourseDefinition>,
}

impl CourseCatalog {
    /// Creates a catalog from definitions, keeping their order.
    pub fn new(courses: Vec<CourseDefinition>) -> Self {
        Self { courses }
    }

    /// Finds the course matching an event summary.
    pub fn find(&self, summary: &str) -> Option<&CourseDefinition> {
        self.courses.iter().find(|c| c.matches(summary))
    }

    /// Returns the event summaries that appear more than once.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (i, course) in self.courses.iter().enumerate() {
            let key = course.event_summary.as_str();
            let seen_before = self.courses[..i].iter().any(|c| c.matches(key));
            if seen_before && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }

    /// Returns the number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Returns true if the catalog has no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Iterates over the courses in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &CourseDefinition> {
        self.courses.iter()
    }
}

impl FromIterator<CourseDefinition> for CourseCatalog {
    fn from_iter<I: IntoIterator<Item = CourseDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A concrete calendar event occurring today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOccurrence {
    /// When the occurrence starts.
    pub start: DateTime<Utc>,
    /// When the occurrence ends.
    pub end: DateTime<Utc>,
    /// The event summary, matched against the catalog.
    pub summary: String,
    /// Where the event takes place.
    pub location: String,
}

impl EventOccurrence {
    /// Creates a new event occurrence.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        summary: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            summary: summary.into(),
            location: location.into(),
        }
    }

    /// Returns the span of the occurrence.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// An event occurrence resolved to its course.
///
/// Built fresh for every resolution run and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOccurrence<'a> {
    /// The matched course.
    pub course: &'a CourseDefinition,
    /// When this occurrence starts.
    pub start: DateTime<Utc>,
    /// When this occurrence ends.
    pub end: DateTime<Utc>,
    /// The room, taken from the calendar event.
    pub location: String,
}

impl<'a> CourseOccurrence<'a> {
    /// Creates a course occurrence from a matched event.
    pub fn from_event(course: &'a CourseDefinition, event: &EventOccurrence) -> Self {
        Self {
            course,
            start: event.start,
            end: event.end,
            location: event.location.clone(),
        }
    }

    /// Checks if the course is in progress at the given time.
    ///
    /// Both bounds are exclusive: a course starting exactly now has not
    /// started yet.
    pub fn is_ongoing_at(&self, now: DateTime<Utc>) -> bool {
        self.start < now && self.end > now
    }

    /// Checks if the course starts at or after the given time.
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.start >= now
    }
}
