//! usw CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use usw_client::cli::{Cli, Command, ConfigAction};
use usw_client::commands;
use usw_client::config::{ClientConfig, expand_tilde};
use usw_client::error::ClientResult;
use usw_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli
        .config
        .as_deref()
        .map(expand_tilde)
        .unwrap_or_else(ClientConfig::default_path);

    if let Some(Command::Config {
        action: ConfigAction::Path,
    }) = cli.command
    {
        return commands::config::path(&config_path);
    }

    let mut config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)?
    } else {
        ClientConfig::load()?
    };
    config.override_sources(&cli.sources);

    let now = commands::status::resolve_now(cli.time)?;
    debug!(now = %now, sources = config.sources.len(), "Starting");

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
        None if cli.print_config => commands::config::print_effective(&config, now),
        None => commands::status::run(&config, now, cli.json).await,
    }
}
