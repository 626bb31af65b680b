//! Recurrence sets: `DTSTART` plus `RRULE` and `RDATE`.
//!
//! Rules are evaluated by the [`rrule`] crate, which covers the full RFC 5545
//! grammar (`YEARLY`, `BYMONTHDAY`, `BYSETPOS`, ...). `RDATE` instants are
//! merged in here. `EXDATE` and overrides are applied by [`crate::expand`] so
//! that `COUNT` still counts the instances they remove.

use chrono::{DateTime, Utc};
use rrule::{RRuleSet, Tz};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, RawEventTime};

const DTSTART_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Upper bound on instances returned by a single query.
const MAX_INSTANCES: u16 = 1000;

/// The instants a recurring event starts at.
#[derive(Debug, Clone)]
pub struct Recurrence {
    rules: Option<RRuleSet>,
    dtstart: DateTime<Utc>,
    rdates: Vec<DateTime<Utc>>,
}

impl Recurrence {
    /// Builds the recurrence set of a series master.
    ///
    /// Without an `RRULE` the set is `DTSTART` plus the `RDATE`s. Date-only
    /// `RDATE`s have no instant and are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorCode::UnsupportedRecurrence`] for all-day series
    /// and rules the `rrule` crate rejects.
    ///
    /// [`ProviderErrorCode::UnsupportedRecurrence`]: crate::error::ProviderErrorCode::UnsupportedRecurrence
    pub fn for_event(master: &RawEvent) -> ProviderResult<Self> {
        let start = master
            .start
            .as_ref()
            .ok_or_else(|| ProviderError::unsupported_recurrence("series without DTSTART"))?;
        let dtstart = start
            .to_utc()
            .ok_or_else(|| ProviderError::unsupported_recurrence("all-day series"))?;

        let rules = match master.rrule.as_deref() {
            Some(rule) => {
                let text = format!("{}\nRRULE:{}", dtstart_line(start)?, rule.trim());
                let set = text.parse::<RRuleSet>().map_err(|e| {
                    ProviderError::unsupported_recurrence(format!("invalid RRULE `{}`", rule))
                        .with_source(e)
                })?;
                Some(set)
            }
            None => None,
        };

        Ok(Self {
            rules,
            dtstart,
            rdates: master.rdates.iter().filter_map(RawEventTime::to_utc).collect(),
        })
    }

    /// Returns the instants in `[from, to]`, sorted and without duplicates.
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut instants: Vec<DateTime<Utc>> = match &self.rules {
            Some(rules) => rules
                .clone()
                .after(from.with_timezone(&Tz::UTC))
                .before(to.with_timezone(&Tz::UTC))
                .all(MAX_INSTANCES)
                .dates
                .into_iter()
                .map(|dt| dt.with_timezone(&Utc))
                .collect(),
            None => vec![self.dtstart],
        };
        instants.extend(self.rdates.iter().copied());

        instants.retain(|instant| *instant >= from && *instant <= to);
        instants.sort();
        instants.dedup();
        instants
    }
}

/// Renders `DTSTART` for the rule parser.
///
/// Floating times and unknown zones are passed without `TZID`, which the
/// parser reads as local time.
fn dtstart_line(start: &RawEventTime) -> ProviderResult<String> {
    match start {
        RawEventTime::Utc(dt) => Ok(format!("DTSTART:{}Z", dt.format(DTSTART_FORMAT))),
        RawEventTime::Zoned { date_time, tzid } if tzid.parse::<chrono_tz::Tz>().is_ok() => Ok(
            format!("DTSTART;TZID={}:{}", tzid, date_time.format(DTSTART_FORMAT)),
        ),
        RawEventTime::Zoned { date_time, .. } | RawEventTime::Floating(date_time) => {
            Ok(format!("DTSTART:{}", date_time.format(DTSTART_FORMAT)))
        }
        RawEventTime::Date(_) => Err(ProviderError::unsupported_recurrence("all-day series")),
    }
}
