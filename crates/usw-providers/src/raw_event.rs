//! Raw event type from calendar sources.
//!
//! This module defines [`RawEvent`], the event data as parsed from a
//! calendar source before recurrence expansion and normalization. Every
//! field the engine needs is optional here: a missing field only becomes an
//! error once the event turns out to be relevant for today.

use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The time specification for a raw event.
///
/// iCalendar times come in four shapes, and the wall-clock ones must keep
/// their zone so recurring events stay at the same local time across DST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum RawEventTime {
    /// A UTC datetime (`...Z`).
    Utc(DateTime<Utc>),
    /// A wall-clock datetime in a named zone (`TZID=...`).
    Zoned {
        /// The local date and time.
        date_time: NaiveDateTime,
        /// The IANA timezone identifier.
        tzid: String,
    },
    /// A wall-clock datetime without zone, interpreted in the local timezone.
    Floating(NaiveDateTime),
    /// An all-day date (no specific time).
    Date(NaiveDate),
}

impl RawEventTime {
    /// Parses an iCalendar date or datetime value.
    ///
    /// Handles formats like:
    /// - `20250205T100000Z` (UTC)
    /// - `20250205T100000` (zoned when `tzid` is given, floating otherwise)
    /// - `20250205` (date only)
    pub fn parse(value: &str, tzid: Option<&str>) -> Option<Self> {
        let value = value.trim();

        if value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()) {
            let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
            return Some(Self::Date(date));
        }

        if let Some(utc) = value.strip_suffix('Z') {
            let dt = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
            return Some(Self::Utc(Utc.from_utc_datetime(&dt)));
        }

        let dt = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
        Some(match tzid {
            Some(tzid) => Self::Zoned {
                date_time: dt,
                tzid: tzid.to_string(),
            },
            None => Self::Floating(dt),
        })
    }

    /// Returns true if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the wall-clock datetime, or `None` for all-day dates.
    ///
    /// UTC times use the UTC wall clock.
    pub fn wall_clock(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Utc(dt) => Some(dt.naive_utc()),
            Self::Zoned { date_time, .. } | Self::Floating(date_time) => Some(*date_time),
            Self::Date(_) => None,
        }
    }

    /// Returns the same kind of time at another wall-clock datetime.
    pub fn at_wall_clock(&self, date_time: NaiveDateTime) -> Self {
        match self {
            Self::Utc(_) => Self::Utc(Utc.from_utc_datetime(&date_time)),
            Self::Zoned { tzid, .. } => Self::Zoned {
                date_time,
                tzid: tzid.clone(),
            },
            Self::Floating(_) => Self::Floating(date_time),
            Self::Date(_) => Self::Date(date_time.date()),
        }
    }

    /// Returns the wall-clock time of `instant` in this time's zone.
    ///
    /// Returns `None` for all-day dates.
    pub fn wall_clock_of(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        match self {
            Self::Utc(_) => Some(instant.naive_utc()),
            Self::Zoned { tzid, .. } => Some(match Tz::from_str(tzid) {
                Ok(tz) => instant.with_timezone(&tz).naive_local(),
                Err(_) => instant.with_timezone(&Local).naive_local(),
            }),
            Self::Floating(_) => Some(instant.with_timezone(&Local).naive_local()),
            Self::Date(_) => None,
        }
    }

    /// Converts to a UTC instant.
    ///
    /// Returns `None` for all-day dates. Unknown TZIDs fall back to the local
    /// timezone.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc(dt) => Some(*dt),
            Self::Zoned { date_time, tzid } => match Tz::from_str(tzid) {
                Ok(tz) => resolve_wall_clock(&tz, *date_time),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown timezone, using local time");
                    resolve_wall_clock(&Local, *date_time)
                }
            },
            Self::Floating(date_time) => resolve_wall_clock(&Local, *date_time),
            Self::Date(_) => None,
        }
    }
}

/// Maps a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are moved forward by one hour.
fn resolve_wall_clock<Tz2: TimeZone>(tz: &Tz2, date_time: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date_time)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(date_time + chrono::Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// A raw calendar event from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Unique identifier of the event (`UID`).
    pub uid: String,

    /// When the event starts (`DTSTART`).
    pub start: Option<RawEventTime>,

    /// When the event ends (`DTEND`).
    pub end: Option<RawEventTime>,

    /// The event title (`SUMMARY`).
    pub summary: Option<String>,

    /// The event location (`LOCATION`).
    pub location: Option<String>,

    /// Whether the event was cancelled (`STATUS:CANCELLED`).
    pub cancelled: bool,

    /// The recurrence rule (`RRULE`), unparsed.
    pub rrule: Option<String>,

    /// Instances removed from the recurrence (`EXDATE`).
    pub exdates: Vec<RawEventTime>,

    /// Extra instances added to the recurrence (`RDATE`).
    #[serde(default)]
    pub rdates: Vec<RawEventTime>,

    /// The instance this event replaces (`RECURRENCE-ID`).
    pub recurrence_id: Option<RawEventTime>,

    /// The calendar source this event was read from.
    pub source: String,
}

impl RawEvent {
    /// Creates a new raw event with only the UID and source set.
    pub fn new(uid: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            start: None,
            end: None,
            summary: None,
            location: None,
            cancelled: false,
            rrule: None,
            exdates: Vec::new(),
            rdates: Vec::new(),
            recurrence_id: None,
            source: source.into(),
        }
    }

    /// Builder method to set start and end.
    pub fn with_times(mut self, start: RawEventTime, end: RawEventTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = Some(rrule.into());
        self
    }

    /// Builder method to add an excluded instance.
    pub fn with_exdate(mut self, exdate: RawEventTime) -> Self {
        self.exdates.push(exdate);
        self
    }

    /// Builder method to add an extra instance.
    pub fn with_rdate(mut self, rdate: RawEventTime) -> Self {
        self.rdates.push(rdate);
        self
    }

    /// Builder method to mark this event as replacing an instance.
    pub fn with_recurrence_id(mut self, recurrence_id: RawEventTime) -> Self {
        self.recurrence_id = Some(recurrence_id);
        self
    }

    /// Builder method to mark the event as cancelled.
    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.as_ref().is_some_and(RawEventTime::is_all_day)
    }

    /// Returns true if this event defines a recurring series.
    ///
    /// A series needs an `RRULE` or at least one `RDATE`, and must not be an
    /// override itself.
    pub fn is_recurring_master(&self) -> bool {
        (self.rrule.is_some() || !self.rdates.is_empty()) && self.recurrence_id.is_none()
    }

    /// Returns a label for log messages and errors.
    pub fn label(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    mod parse {
        use super::*;

        #[test]
        fn utc_value() {
            let time = RawEventTime::parse("20250205T143000Z", None).unwrap();
            assert_eq!(time, RawEventTime::Utc(utc(2025, 2, 5, 14, 30)));
        }

        #[test]
        fn date_only() {
            let time = RawEventTime::parse("20250210", None).unwrap();
            assert_eq!(
                time,
                RawEventTime::Date(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
            );
            assert!(time.is_all_day());
        }

        #[test]
        fn zoned_value() {
            let time = RawEventTime::parse("20251013T101500", Some("Europe/Berlin")).unwrap();
            assert_eq!(
                time,
                RawEventTime::Zoned {
                    date_time: naive(2025, 10, 13, 10, 15),
                    tzid: "Europe/Berlin".to_string(),
                }
            );
        }

        #[test]
        fn floating_value() {
            let time = RawEventTime::parse("20251013T101500", None).unwrap();
            assert_eq!(time, RawEventTime::Floating(naive(2025, 10, 13, 10, 15)));
        }

        #[test]
        fn garbage() {
            assert!(RawEventTime::parse("tomorrow", None).is_none());
            assert!(RawEventTime::parse("2025-10-13", None).is_none());
        }
    }

    mod to_utc {
        use super::*;

        #[test]
        fn zoned_summer_and_winter() {
            let summer = RawEventTime::Zoned {
                date_time: naive(2025, 10, 13, 10, 0),
                tzid: "Europe/Berlin".to_string(),
            };
            assert_eq!(summer.to_utc(), Some(utc(2025, 10, 13, 8, 0)));

            let winter = summer.at_wall_clock(naive(2025, 11, 3, 10, 0));
            assert_eq!(winter.to_utc(), Some(utc(2025, 11, 3, 9, 0)));
        }

        #[test]
        fn dst_gap_moves_forward() {
            let in_gap = RawEventTime::Zoned {
                date_time: naive(2025, 3, 30, 2, 30),
                tzid: "Europe/Berlin".to_string(),
            };
            // 03:30 CEST
            assert_eq!(in_gap.to_utc(), Some(utc(2025, 3, 30, 1, 30)));
        }

        #[test]
        fn ambiguous_takes_earliest() {
            let ambiguous = RawEventTime::Zoned {
                date_time: naive(2025, 10, 26, 2, 30),
                tzid: "Europe/Berlin".to_string(),
            };
            // 02:30 CEST, before the clocks go back
            assert_eq!(ambiguous.to_utc(), Some(utc(2025, 10, 26, 0, 30)));
        }

        #[test]
        fn date_has_no_instant() {
            let date = RawEventTime::Date(NaiveDate::from_ymd_opt(2025, 10, 13).unwrap());
            assert_eq!(date.to_utc(), None);
            assert_eq!(date.wall_clock(), None);
        }

        #[test]
        fn wall_clock_of_instant_in_zone() {
            let zoned = RawEventTime::Zoned {
                date_time: naive(2025, 10, 13, 10, 0),
                tzid: "Europe/Berlin".to_string(),
            };
            assert_eq!(
                zoned.wall_clock_of(utc(2025, 11, 3, 9, 0)),
                Some(naive(2025, 11, 3, 10, 0))
            );
            assert_eq!(
                RawEventTime::Utc(utc(2025, 10, 13, 9, 0)).wall_clock_of(utc(2025, 11, 3, 9, 0)),
                Some(naive(2025, 11, 3, 9, 0))
            );
        }

        #[test]
        fn utc_wall_clock_roundtrip() {
            let time = RawEventTime::Utc(utc(2025, 10, 13, 9, 0));
            let moved = time.at_wall_clock(naive(2025, 10, 20, 9, 0));
            assert_eq!(moved.to_utc(), Some(utc(2025, 10, 20, 9, 0)));
        }
    }

    mod raw_event {
        use super::*;

        #[test]
        fn builder_pattern() {
            let event = RawEvent::new("uid-1", "cal.ics")
                .with_times(
                    RawEventTime::Utc(utc(2025, 10, 13, 9, 0)),
                    RawEventTime::Utc(utc(2025, 10, 13, 10, 0)),
                )
                .with_summary("CS101")
                .with_location("A1")
                .with_rrule("FREQ=WEEKLY");

            assert_eq!(event.label(), "CS101");
            assert!(event.is_recurring_master());
            assert!(!event.is_all_day());
            assert!(!event.cancelled);
        }

        #[test]
        fn override_is_not_master() {
            let event = RawEvent::new("uid-1", "cal.ics")
                .with_rrule("FREQ=WEEKLY")
                .with_recurrence_id(RawEventTime::Utc(utc(2025, 10, 13, 9, 0)));
            assert!(!event.is_recurring_master());
            assert_eq!(event.label(), "uid-1");
        }

        #[test]
        fn rdate_alone_makes_a_series() {
            let event = RawEvent::new("uid-1", "cal.ics")
                .with_rdate(RawEventTime::Utc(utc(2025, 10, 15, 9, 0)));
            assert!(event.rrule.is_none());
            assert!(event.is_recurring_master());
        }
    }
}
