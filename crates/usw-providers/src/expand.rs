//! Expansion of raw calendar events into the occurrences of one day.
//!
//! Recurring series are unrolled with [`Recurrence`], minus their
//! `EXDATE`s and the instances replaced by `RECURRENCE-ID` overrides. Every
//! returned event is a single occurrence that overlaps the window.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tracing::{debug, warn};
use usw_core::TimeWindow;

use crate::raw_event::{RawEvent, RawEventTime};
use crate::recurrence::Recurrence;

/// Returns the occurrences of `events` that overlap `window`, sorted by start.
///
/// Cancelled and all-day events are dropped. Events without a start time are
/// passed through so normalization can report them.
pub fn expand_for_day(events: &[RawEvent], window: &TimeWindow) -> Vec<RawEvent> {
    let overrides = collect_overrides(events);
    let mut occurrences = Vec::new();

    for event in events {
        if event.cancelled {
            debug!(event = %event.label(), "Skipping cancelled event");
            continue;
        }
        if event.is_all_day() {
            debug!(event = %event.label(), "Skipping all-day event");
            continue;
        }

        if event.is_recurring_master() {
            let replaced = overrides.get(event.uid.as_str()).map_or(&[][..], Vec::as_slice);
            expand_series(event, replaced, window, &mut occurrences);
        } else if overlaps_window(event, window) {
            occurrences.push(event.clone());
        }
    }

    occurrences.sort_by_key(|event| event.start.as_ref().and_then(RawEventTime::to_utc));

    debug!(
        count = occurrences.len(),
        window_start = %window.start,
        "Expanded events for day"
    );
    occurrences
}

/// Maps each UID to the instants its `RECURRENCE-ID` overrides replace.
///
/// Cancelled overrides count too: they remove the instance without adding one.
fn collect_overrides(events: &[RawEvent]) -> HashMap<&str, Vec<DateTime<Utc>>> {
    let mut overrides: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for event in events {
        if let Some(instant) = event.recurrence_id.as_ref().and_then(RawEventTime::to_utc) {
            overrides.entry(event.uid.as_str()).or_default().push(instant);
        }
    }
    overrides
}

fn overlaps_window(event: &RawEvent, window: &TimeWindow) -> bool {
    let Some(start) = event.start.as_ref() else {
        return true;
    };
    let Some(start) = start.to_utc() else {
        return false;
    };
    let end = event
        .end
        .as_ref()
        .and_then(RawEventTime::to_utc)
        .unwrap_or(start);
    window.overlaps(start, end.max(start))
}

/// Pushes the instances of a recurring series that overlap `window`.
fn expand_series(
    master: &RawEvent,
    replaced: &[DateTime<Utc>],
    window: &TimeWindow,
    out: &mut Vec<RawEvent>,
) {
    let Some(start) = master.start.as_ref() else {
        out.push(master.clone());
        return;
    };
    let recurrence = match Recurrence::for_event(master) {
        Ok(recurrence) => recurrence,
        Err(e) => {
            warn!(
                event = %master.label(),
                rrule = ?master.rrule,
                error = %e,
                "Skipping recurring event"
            );
            return;
        }
    };
    let Some(dtstart) = start.wall_clock() else {
        return;
    };
    // Wall-clock length, so instances keep their local times across DST.
    let length = master
        .end
        .as_ref()
        .and_then(RawEventTime::wall_clock)
        .map(|end| end - dtstart);
    // An instance may begin before the window and still run into it.
    let lookback =
        length.unwrap_or_else(TimeDelta::zero).max(TimeDelta::zero()) + TimeDelta::days(1);

    for instance_start in recurrence.between(window.start - lookback, window.end) {
        let wall_clock = start.wall_clock_of(instance_start);

        if is_excluded(master, instance_start, wall_clock.map(|wc| wc.date())) {
            debug!(event = %master.label(), start = %instance_start, "Skipping EXDATE instance");
            continue;
        }
        if replaced.contains(&instance_start) {
            debug!(event = %master.label(), start = %instance_start, "Instance replaced by override");
            continue;
        }

        let instance_end = match (master.end.as_ref(), length, wall_clock) {
            (Some(end), Some(length), Some(wall_clock)) => {
                end.at_wall_clock(wall_clock + length).to_utc()
            }
            _ => None,
        };
        let until = instance_end.unwrap_or(instance_start).max(instance_start);
        if !window.overlaps(instance_start, until) {
            continue;
        }

        let mut occurrence = master.clone();
        occurrence.start = Some(RawEventTime::Utc(instance_start));
        occurrence.end = instance_end.map(RawEventTime::Utc);
        occurrence.rrule = None;
        occurrence.exdates.clear();
        occurrence.rdates.clear();
        occurrence.recurrence_id = Some(RawEventTime::Utc(instance_start));
        out.push(occurrence);
    }
}

fn is_excluded(master: &RawEvent, start: DateTime<Utc>, date: Option<NaiveDate>) -> bool {
    master.exdates.iter().any(|exdate| match exdate {
        RawEventTime::Date(excluded) => Some(*excluded) == date,
        other => other.to_utc() == Some(start),
    })
}
