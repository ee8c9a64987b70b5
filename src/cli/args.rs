use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "odm_ledger",
    version,
    about = "Record device test batches and their results in a SQLite store"
)]
pub struct Cli {
    /// Store location, e.g. `sqlite:odm.db` (defaults to odm.db under the home directory)
    #[arg(long, global = true, env = "ODM_LEDGER_DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new build batch
    Init(InitArgs),
    /// Import an analyzer result file into a registered batch
    Import(ImportArgs),
    /// Show a batch and its result tally
    Show(ShowArgs),
    /// List registered batches
    List,
    /// Load generation and query timing on a scratch store
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// CI build tag, e.g. Jenkins BUILD_TAG
    #[arg(long, alias = "batch_id")]
    pub batch_id: String,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[arg(long, alias = "batch_id")]
    pub batch_id: String,

    /// JSON result file written by the analyzer
    #[arg(long, alias = "file_path")]
    pub file_path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[arg(long, alias = "batch_id")]
    pub batch_id: String,

    /// Also print every device row
    #[arg(long)]
    pub details: bool,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    #[command(subcommand)]
    pub command: BenchCommand,
}

#[derive(Subcommand, Debug)]
pub enum BenchCommand {
    /// Reset the target store and fill it with synthetic batches
    Load(BenchLoadArgs),
    /// Time a device/result lookup against the target store
    Query(BenchQueryArgs),
}

#[derive(Args, Debug)]
pub struct BenchLoadArgs {
    /// Scratch store to reset; must differ from the configured database
    #[arg(long)]
    pub target: PathBuf,

    #[arg(long, default_value_t = 1000)]
    pub batches: u32,

    #[arg(long, default_value_t = 50)]
    pub devices: u32,

    #[arg(long)]
    pub success_weight: Option<u32>,

    #[arg(long)]
    pub fail_weight: Option<u32>,

    #[arg(long)]
    pub log_root: Option<String>,

    /// Seed for a reproducible status draw
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct BenchQueryArgs {
    #[arg(long)]
    pub target: PathBuf,

    #[arg(long, default_value = "device_043")]
    pub device: String,

    #[arg(long, default_value = "FAIL")]
    pub result: String,
}
