use crate::cli::args::{BenchLoadArgs, BenchQueryArgs};
use crate::cli::report::Report;
use crate::config::Config;
use crate::services::{BenchService, LoadPlan};

pub async fn load(config: &Config, args: BenchLoadArgs) -> Report {
    let plan = LoadPlan {
        batch_count: args.batches,
        devices_per_batch: args.devices,
        success_weight: args.success_weight.unwrap_or(config.bench.success_weight),
        fail_weight: args.fail_weight.unwrap_or(config.bench.fail_weight),
        log_root: args
            .log_root
            .unwrap_or_else(|| config.bench.log_root.clone()),
        seed: args.seed,
    };
    let bench = BenchService::new(args.target, config.database_path());

    match bench.generate_load(&plan).await {
        Ok(report) => Report::success(format!(
            "Inserted {} rows across {} batches",
            report.intended_rows, report.batches
        ))
        .with_rows(report.actual_rows)
        .with_line(format!("Rows in store: {}", report.actual_rows))
        .with_line(format!("Elapsed: {:.2} s", report.elapsed.as_secs_f64())),
        Err(e) => e.into(),
    }
}

pub async fn query(args: BenchQueryArgs) -> Report {
    let bench = BenchService::new(args.target, None);

    match bench.benchmark_query(&args.device, &args.result).await {
        Ok(report) => Report::info(format!(
            "Query for {} with result {}",
            report.device_serial, report.result
        ))
        .with_rows(report.matches.len() as u64)
        .with_line(format!("Matches: {}", report.matches.len()))
        .with_line(format!("Elapsed: {:.4} ms", report.elapsed_ms())),
        Err(e) => e.into(),
    }
}
