mod cli;
mod config;
mod error;
mod models;
mod paths;
mod repository;
mod services;

use crate::cli::args::Cli;
use crate::config::Config;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odm_ledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.override_database_url(database_url)?;
    }
    tracing::debug!("Starting odm_ledger with config: {:?}", config);

    let report = cli::dispatch(cli.command, &config).await;
    tracing::debug!(
        severity = report.severity.label(),
        rows = ?report.rows,
        "Command finished"
    );
    println!("{}", report.render());

    Ok(report.exit_code())
}
