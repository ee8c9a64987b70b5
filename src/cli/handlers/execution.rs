use crate::cli::AppState;
use crate::cli::args::{InitArgs, ShowArgs};
use crate::cli::report::Report;

pub async fn init(state: &AppState, args: InitArgs) -> Report {
    match state.execution_service.create_execution(&args.batch_id).await {
        Ok(execution) => Report::success(format!(
            "Registered batch {} as execution {}",
            execution.batch_id, execution.id
        )),
        Err(e) => e.into(),
    }
}

pub async fn show(state: &AppState, args: ShowArgs) -> Report {
    let overview = match state.execution_service.describe(&args.batch_id).await {
        Ok(overview) => overview,
        Err(e) => return e.into(),
    };

    let total = overview.total();
    let mut report = Report::info(format!(
        "Batch {} (execution {}, created {}): {} results",
        overview.execution.batch_id, overview.execution.id, overview.execution.created_at, total
    ))
    .with_rows(u64::try_from(total).unwrap_or_default());
    for count in &overview.results {
        report = report.with_line(format!("{}: {}", count.result, count.count));
    }

    if args.details {
        match state.execution_service.details(overview.execution.id).await {
            Ok(details) => {
                for detail in details {
                    report = report.with_line(format!(
                        "{}  {}  {}",
                        detail.device_serial, detail.result, detail.log_path
                    ));
                }
            }
            Err(e) => return e.into(),
        }
    }
    report
}

pub async fn list(state: &AppState) -> Report {
    let executions = match state.execution_service.list_executions().await {
        Ok(executions) => executions,
        Err(e) => return e.into(),
    };

    let mut report = Report::info(format!("{} registered batches", executions.len()))
        .with_rows(executions.len() as u64);
    for execution in executions {
        report = report.with_line(format!(
            "{}  {}  {}  {} results",
            execution.id, execution.batch_id, execution.created_at, execution.detail_count
        ));
    }
    report
}
