//! ICS/iCalendar parsing.
//!
//! This module parses iCalendar (RFC 5545) data and converts each `VEVENT`
//! into a [`RawEvent`]. Recurrence is not expanded here; see
//! [`crate::expand`].

use chrono::TimeDelta;
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike,
    Property,
};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, RawEventTime};

/// Parses ICS content and extracts its events.
///
/// Components other than `VEVENT` are ignored. Events without a `UID` get a
/// positional one so overrides cannot accidentally attach to them.
pub fn parse_ics_content(ics: &str, source: &str) -> ProviderResult<Vec<RawEvent>> {
    let calendar = ics.parse::<Calendar>().map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse iCalendar data: {}", e))
            .with_source_path(source)
    })?;

    let events: Vec<RawEvent> = calendar
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(event),
            _ => None,
        })
        .enumerate()
        .map(|(index, event)| parse_event(event, index, source))
        .collect();

    debug!(source = %source, count = events.len(), "Parsed events from ICS");
    Ok(events)
}

/// Parses a single VEVENT component into a RawEvent.
fn parse_event(event: &Event, index: usize, source: &str) -> RawEvent {
    let uid = event
        .get_uid()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}#{}", source, index));

    let mut raw = RawEvent::new(uid, source);
    raw.start = event.get_start().map(convert_date_time);
    raw.end = event.get_end().map(convert_date_time);
    if raw.end.is_none() {
        raw.end = end_from_duration(event, raw.start.as_ref());
    }
    raw.summary = event.get_summary().map(str::to_string);
    raw.location = event.get_location().map(str::to_string);
    raw.cancelled = event
        .property_value("STATUS")
        .is_some_and(|status| status.trim().eq_ignore_ascii_case("CANCELLED"));
    raw.rrule = event.property_value("RRULE").map(str::to_string);
    raw.recurrence_id = event
        .properties()
        .get("RECURRENCE-ID")
        .and_then(|prop| property_times(prop).into_iter().next());
    raw.exdates = repeated_properties(event, "EXDATE")
        .flat_map(property_times)
        .collect();
    raw.rdates = repeated_properties(event, "RDATE")
        .flat_map(property_times)
        .collect();

    debug!(
        uid = %raw.uid,
        summary = ?raw.summary,
        start = ?raw.start,
        recurring = raw.is_recurring_master(),
        "Parsed event from ICS"
    );

    raw
}

/// Returns every property called `name`, whether stored once or repeated.
fn repeated_properties<'a>(event: &'a Event, name: &str) -> impl Iterator<Item = &'a Property> {
    event
        .properties()
        .get(name)
        .into_iter()
        .chain(event.multi_properties().get(name).into_iter().flatten())
}

/// Derives `DTEND` from `DTSTART` and `DURATION`.
///
/// The duration is added to the wall clock, so the end stays in the start's
/// zone.
fn end_from_duration(event: &Event, start: Option<&RawEventTime>) -> Option<RawEventTime> {
    let start = start?;
    let value = event.property_value("DURATION")?;
    let Some(duration) = parse_duration(value) else {
        debug!(duration = %value, "Ignoring malformed DURATION");
        return None;
    };
    let wall_clock = start.wall_clock()?;
    Some(start.at_wall_clock(wall_clock + duration))
}

/// Parses an RFC 5545 duration such as `PT1H30M`, `P1D` or `-PT15M`.
fn parse_duration(value: &str) -> Option<TimeDelta> {
    let value = value.trim();
    let (negative, value) = match value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let value = value.strip_prefix('P')?;

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    let mut in_time = false;
    let mut seen = false;

    for c in value.chars() {
        match c {
            '0'..='9' => digits.push(c),
            'T' if !in_time && digits.is_empty() => in_time = true,
            unit => {
                let n: i64 = digits.parse().ok()?;
                digits.clear();
                total += match (in_time, unit) {
                    (false, 'W') => TimeDelta::try_weeks(n)?,
                    (false, 'D') => TimeDelta::try_days(n)?,
                    (true, 'H') => TimeDelta::try_hours(n)?,
                    (true, 'M') => TimeDelta::try_minutes(n)?,
                    (true, 'S') => TimeDelta::try_seconds(n)?,
                    _ => return None,
                };
                seen = true;
            }
        }
    }

    if !seen || !digits.is_empty() {
        return None;
    }
    Some(if negative { -total } else { total })
}

/// Reads the (possibly comma-separated) date values of a property.
fn property_times(prop: &Property) -> Vec<RawEventTime> {
    let tzid = prop.params().get("TZID").map(|p| p.value());
    prop.value()
        .split(',')
        .filter_map(|value| RawEventTime::parse(value, tzid))
        .collect()
}

/// Converts icalendar DatePerhapsTime to RawEventTime.
fn convert_date_time(dt: DatePerhapsTime) -> RawEventTime {
    match dt {
        DatePerhapsTime::Date(date) => RawEventTime::Date(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => RawEventTime::Utc(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            RawEventTime::Floating(naive)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            RawEventTime::Zoned { date_time, tzid }
        }
    }
}
