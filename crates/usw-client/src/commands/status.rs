//! The default command: print where the next class is.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::debug;
use usw_core::{
    CourseCatalog, EventOccurrence, JsonStatus, TimeWindow, compose, match_courses, resolve,
};
use usw_providers::{CalendarProvider, IcsProvider, expand_for_day, to_occurrences};

use crate::cli::TIME_FORMAT;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Resolves "now": the `--time` override in local time, or the wall clock.
pub fn resolve_now(time: Option<NaiveDateTime>) -> ClientResult<DateTime<Utc>> {
    match time {
        Some(local) => Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                ClientError::InvalidTime(format!(
                    "{} does not exist in the local timezone",
                    local.format(TIME_FORMAT)
                ))
            }),
        None => Ok(Utc::now()),
    }
}

/// Returns the local calendar day containing `now`.
pub fn today_window(now: DateTime<Utc>) -> ClientResult<TimeWindow> {
    let date = now.with_timezone(&Local).date_naive();
    TimeWindow::for_date(date, &Local)
        .ok_or_else(|| ClientError::InvalidTime(format!("no local midnight on {}", date)))
}

/// Renders the output lines for today's occurrences.
///
/// In text mode every matching warning gets its own line before the status
/// line. In JSON mode a single document carries both.
pub fn render(
    now: DateTime<Utc>,
    occurrences: &[EventOccurrence],
    catalog: &CourseCatalog,
    json: bool,
) -> ClientResult<Vec<String>> {
    let outcome = match_courses(occurrences, catalog);
    let state = resolve(now, &outcome.courses);
    debug!(
        matched = outcome.courses.len(),
        warnings = outcome.warnings.len(),
        finished = state.is_finished(),
        "Resolved schedule"
    );

    if json {
        let status = JsonStatus::new(now, &state, &outcome.warnings);
        return Ok(vec![serde_json::to_string(&status)?]);
    }

    let mut lines: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
    lines.push(compose(now, &state));
    Ok(lines)
}

/// Fetches the configured sources and prints the status.
pub async fn run(config: &ClientConfig, now: DateTime<Utc>, json: bool) -> ClientResult<()> {
    let provider = IcsProvider::new(config.sources.clone(), config.provider_config())?;
    let raw = provider.fetch_events().await?;

    let window = today_window(now)?;
    let today = expand_for_day(&raw, &window);
    let occurrences = to_occurrences(&today)?;

    for line in render(now, &occurrences, &config.catalog(), json)? {
        println!("{}", line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use usw_core::CourseDefinition;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 13, h, m, 0).unwrap()
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::new(vec![
            CourseDefinition::new("CS101 Lecture", "Intro CS", "CS"),
            CourseDefinition::new("MATH201 Lecture", "Linear Algebra", "LA"),
        ])
    }

    fn day() -> Vec<EventOccurrence> {
        vec![
            EventOccurrence::new(at(9, 0), at(10, 30), "CS101 Lecture", "Room 1"),
            EventOccurrence::new(at(10, 35), at(11, 0), "Mensa", "Cafeteria"),
            EventOccurrence::new(at(11, 0), at(12, 0), "MATH201 Lecture", "Room 2"),
        ]
    }

    #[test]
    fn text_output_lists_warnings_first() {
        let lines = render(at(10, 0), &day(), &catalog(), false).unwrap();
        assert_eq!(
            lines,
            vec![
                "Mensa not found".to_string(),
                "CS ends in 30min. Next: Linear Algebra in Room 2 after 30min break.".to_string(),
            ]
        );
    }

    #[test]
    fn finished_day() {
        let lines = render(at(13, 0), &day(), &catalog(), false).unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("finished for the day"));
    }

    #[test]
    fn empty_day() {
        let lines = render(at(13, 0), &[], &catalog(), false).unwrap();
        assert_eq!(lines, vec!["finished for the day".to_string()]);
    }

    #[test]
    fn json_output_is_single_document() {
        let lines = render(at(10, 0), &day(), &catalog(), true).unwrap();
        assert_eq!(lines.len(), 1);

        let status: JsonStatus = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(status.current.map(|c| c.short_name), Some("CS".to_string()));
        assert_eq!(status.next.map(|c| c.location), Some("Room 2".to_string()));
        assert_eq!(status.break_minutes, Some(30));
        assert_eq!(status.warnings, vec!["Mensa not found".to_string()]);
    }

    #[test]
    fn resolve_now_from_local_time() {
        let local = NaiveDateTime::parse_from_str("2025-10-13T09:30", TIME_FORMAT).unwrap();
        let now = resolve_now(Some(local)).unwrap();
        assert_eq!(now.with_timezone(&Local).naive_local(), local);
    }

    #[test]
    fn today_window_contains_now() {
        let now = at(12, 0);
        let window = today_window(now).unwrap();
        assert!(window.contains(now));
        assert_eq!(window.start.with_timezone(&Local).date_naive(), now.with_timezone(&Local).date_naive());
    }
}
