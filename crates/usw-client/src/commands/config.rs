//! Configuration commands.

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use usw_core::CourseDefinition;
use usw_providers::CalendarSource;

use crate::cli::TIME_FORMAT;
use crate::config::{ClientConfig, HttpSettings};
use crate::error::{ClientError, ClientResult};

/// The configuration as a run would use it, including the resolved time.
#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    now: String,
    courses: &'a [CourseDefinition],
    sources: &'a [CalendarSource],
    http: &'a HttpSettings,
}

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    println!("# usw.cfg ({})", path.display());
    println!("{}", to_toml(config)?);
    Ok(())
}

/// Print the effective configuration (`--print-config`).
pub fn print_effective(config: &ClientConfig, now: DateTime<Utc>) -> ClientResult<()> {
    println!("{}", effective_toml(config, now)?);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    check(config)?;
    println!(
        "Configuration is valid: {} courses, {} sources.",
        config.courses.len(),
        config.sources.len()
    );
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

fn to_toml(config: &ClientConfig) -> ClientResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

fn effective_toml(config: &ClientConfig, now: DateTime<Utc>) -> ClientResult<String> {
    let effective = EffectiveConfig {
        now: now.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        courses: &config.courses,
        sources: &config.sources,
        http: &config.http,
    };
    toml::to_string_pretty(&effective)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
}

fn check(config: &ClientConfig) -> ClientResult<()> {
    let catalog = config.catalog();
    let duplicates = catalog.duplicate_keys();
    if !duplicates.is_empty() {
        return Err(ClientError::Config(format!(
            "courses defined more than once: {}",
            duplicates.join(", ")
        )));
    }

    if let Some(course) = config
        .courses
        .iter()
        .find(|c| c.event_summary.is_empty() || c.short_name.is_empty())
    {
        return Err(ClientError::Config(format!(
            "course {:?} needs a non-empty event-name and short-name",
            course.display_name
        )));
    }

    if config.sources.is_empty() {
        return Err(ClientError::Config(
            "no calendar sources configured".to_string(),
        ));
    }

    if config.http.timeout == 0 {
        return Err(ClientError::Config(
            "http.timeout must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
