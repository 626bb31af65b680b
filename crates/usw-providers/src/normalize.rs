//! RawEvent to EventOccurrence conversion.
//!
//! Expanded events still carry optional fields; the engine needs all four of
//! start, end, summary and location. A missing one aborts the run with
//! [`ScheduleError::MissingField`].

use usw_core::{EventOccurrence, ScheduleError, ScheduleResult};

use crate::raw_event::{RawEvent, RawEventTime};

/// Converts an expanded [`RawEvent`] to an [`EventOccurrence`].
pub fn to_occurrence(raw: &RawEvent) -> ScheduleResult<EventOccurrence> {
    let start = raw
        .start
        .as_ref()
        .and_then(RawEventTime::to_utc)
        .ok_or_else(|| ScheduleError::missing_field(raw.label(), "start"))?;
    let end = raw
        .end
        .as_ref()
        .and_then(RawEventTime::to_utc)
        .ok_or_else(|| ScheduleError::missing_field(raw.label(), "end"))?;
    let summary = raw
        .summary
        .as_deref()
        .ok_or_else(|| ScheduleError::missing_field(raw.label(), "summary"))?;
    let location = raw
        .location
        .as_deref()
        .ok_or_else(|| ScheduleError::missing_field(raw.label(), "location"))?;

    Ok(EventOccurrence::new(start, end, summary, location))
}

/// Converts every event, stopping at the first one with a missing field.
pub fn to_occurrences(raws: &[RawEvent]) -> ScheduleResult<Vec<EventOccurrence>> {
    raws.iter().map(to_occurrence).collect()
}
