//! `policyql`: compile persisted queries, synthesize defaults, list operators.
//!
//! Generated output goes to stdout; logs go to stderr. Any failure is
//! logged and the process exits with status 1.

mod command;

use clap::Parser;
use command::Cli;
use policyql_config::{CONFIG_FILE_NAME, Config, DEFAULT_LOG_FILTER};
use std::{
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::resolve(config_path(cli.config.as_deref()).as_deref());
    init_tracing(
        config
            .as_ref()
            .map_or(DEFAULT_LOG_FILTER, |config| config.log.filter.as_str()),
    );

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    match command::run(&cli.command, &config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

// explicit path, else ./policyql.toml when present
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        local.is_file().then_some(local)
    })
}

// RUST_LOG wins over the configured filter
fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
