//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

/// Format accepted by `--time`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// usw - where is your next class?
#[derive(Debug, Parser)]
#[command(name = "usw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "USW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretend it is this local time (YYYY-MM-DDTHH:MM)
    #[arg(long, short, value_parser = parse_time)]
    pub time: Option<NaiveDateTime>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Calendar sources to use instead of the configured ones
    ///
    /// Sources starting with `http` are fetched, anything else is read from disk.
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_time_and_sources() {
        let cli = Cli::try_parse_from([
            "usw",
            "--time",
            "2025-10-13T09:30",
            "--json",
            "https://uni.example/cal.ics",
            "local.ics",
        ])
        .unwrap();

        assert_eq!(
            cli.time.map(|t| t.format(TIME_FORMAT).to_string()),
            Some("2025-10-13T09:30".to_string())
        );
        assert!(cli.json);
        assert_eq!(cli.sources, vec!["https://uni.example/cal.ics", "local.ics"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_bad_time() {
        assert!(Cli::try_parse_from(["usw", "-t", "09:30"]).is_err());
        assert!(Cli::try_parse_from(["usw", "-t", "2025-10-13 09:30"]).is_err());
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::try_parse_from(["usw", "-c", "/tmp/usw.cfg", "config", "validate"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/usw.cfg")));
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }
}
