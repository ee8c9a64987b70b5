pub mod args;
mod handlers;
pub mod report;

use crate::config::Config;
use crate::error::Result;
use crate::repository::{DetailRepository, ExecutionRepository, establish_connection};
use crate::services::{ExecutionService, ImportService};
use args::{BenchCommand, Command};
use report::Report;

pub struct AppState {
    pub execution_service: ExecutionService,
    pub import_service: ImportService,
}

impl AppState {
    /// Opens the configured store, creating the schema if it is missing.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = establish_connection(&config.database_url).await?;
        tracing::debug!("Database connected: {}", config.database_url);

        let exec_repo = ExecutionRepository::new(pool.clone());
        let detail_repo = DetailRepository::new(pool);
        Ok(Self {
            execution_service: ExecutionService::new(exec_repo.clone(), detail_repo.clone()),
            import_service: ImportService::new(exec_repo, detail_repo),
        })
    }
}

/// Runs one command. Bench commands work on their own target store and
/// never open the configured one. A store that cannot be opened is
/// reported like any other failure.
pub async fn dispatch(command: Command, config: &Config) -> Report {
    match command {
        Command::Init(args) => match AppState::open(config).await {
            Ok(state) => handlers::execution::init(&state, args).await,
            Err(e) => e.into(),
        },
        Command::Import(args) => match AppState::open(config).await {
            Ok(state) => handlers::import::import(&state, args).await,
            Err(e) => e.into(),
        },
        Command::Show(args) => match AppState::open(config).await {
            Ok(state) => handlers::execution::show(&state, args).await,
            Err(e) => e.into(),
        },
        Command::List => match AppState::open(config).await {
            Ok(state) => handlers::execution::list(&state).await,
            Err(e) => e.into(),
        },
        Command::Bench(bench) => match bench.command {
            BenchCommand::Load(args) => handlers::bench::load(config, args).await,
            BenchCommand::Query(args) => handlers::bench::query(args).await,
        },
    }
}
