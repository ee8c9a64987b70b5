use crate::cli::AppState;
use crate::cli::args::ImportArgs;
use crate::cli::report::Report;
use crate::services::ImportOutcome;

pub async fn import(state: &AppState, args: ImportArgs) -> Report {
    tracing::debug!(
        "Importing {} into batch {}",
        args.file_path.display(),
        args.batch_id
    );

    match state
        .import_service
        .import_results(&args.batch_id, &args.file_path)
        .await
    {
        Ok(ImportOutcome::Imported {
            batch_id,
            execution_id,
            rows,
        }) => Report::success(format!(
            "Imported {} test results into batch {} (execution {})",
            rows, batch_id, execution_id
        ))
        .with_rows(rows),
        Ok(ImportOutcome::Empty { source, .. }) => Report::warn(format!(
            "Result file {} is empty, nothing imported",
            source.display()
        ))
        .with_rows(0),
        Err(e) => e.into(),
    }
}
