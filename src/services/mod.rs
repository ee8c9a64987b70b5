mod bench_service;
mod execution_service;
mod import_service;

pub use bench_service::{BenchService, LoadPlan};
pub use execution_service::ExecutionService;
pub use import_service::{ImportOutcome, ImportService};
