use crate::error::{AppError, Result};
use crate::models::{Detail, Execution, ExecutionSummary, ResultCount};
use crate::repository::{DetailRepository, ExecutionRepository};

#[derive(Clone)]
pub struct ExecutionService {
    exec_repo: ExecutionRepository,
    detail_repo: DetailRepository,
}

/// An execution and the tally of its device results.
#[derive(Debug)]
pub struct BatchOverview {
    pub execution: Execution,
    pub results: Vec<ResultCount>,
}

impl BatchOverview {
    pub fn total(&self) -> i64 {
        self.results.iter().map(|r| r.count).sum()
    }
}

impl ExecutionService {
    pub fn new(exec_repo: ExecutionRepository, detail_repo: DetailRepository) -> Self {
        Self {
            exec_repo,
            detail_repo,
        }
    }

    /// Registers a new batch. Executions are append-only: re-registering an
    /// existing batch id fails with [`AppError::BatchAlreadyExists`] and the
    /// stored row is left as it was.
    pub async fn create_execution(&self, batch_id: &str) -> Result<Execution> {
        let batch_id = validate_batch_id(batch_id)?;

        match self.exec_repo.create(batch_id).await {
            Ok(execution) => {
                tracing::info!(
                    "Registered batch {} as execution {}",
                    execution.batch_id,
                    execution.id
                );
                Ok(execution)
            }
            Err(AppError::BatchAlreadyExists(id)) => {
                tracing::warn!("Batch ID already exists: {}", id);
                Err(AppError::BatchAlreadyExists(id))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn describe(&self, batch_id: &str) -> Result<BatchOverview> {
        let batch_id = validate_batch_id(batch_id)?;
        let execution = self.exec_repo.get_by_batch_id(batch_id).await?;
        let results = self.detail_repo.count_by_result(execution.id).await?;

        Ok(BatchOverview { execution, results })
    }

    pub async fn details(&self, execution_id: i64) -> Result<Vec<Detail>> {
        self.detail_repo.list_by_execution(execution_id).await
    }

    pub async fn list_executions(&self) -> Result<Vec<ExecutionSummary>> {
        self.exec_repo.list_summaries().await
    }
}

pub(crate) fn validate_batch_id(batch_id: &str) -> Result<&str> {
    if batch_id.trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "Batch ID cannot be empty".to_string(),
        ));
    }
    Ok(batch_id)
}
