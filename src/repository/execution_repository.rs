use crate::error::{AppError, Result};
use crate::models::{Execution, ExecutionSummary};
use crate::repository::DbPool;
use sqlx::SqliteConnection;

#[derive(Clone)]
pub struct ExecutionRepository {
    pool: DbPool,
}

impl ExecutionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts a new execution. A duplicate `batch_id` is reported as
    /// [`AppError::BatchAlreadyExists`] and leaves the table untouched.
    pub async fn create(&self, batch_id: &str) -> Result<Execution> {
        let execution = sqlx::query_as::<_, Execution>(
            r#"
            INSERT INTO test_execution (batch_id)
            VALUES (?)
            RETURNING id, batch_id, created_at
            "#,
        )
        .bind(batch_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BatchAlreadyExists(batch_id.to_string())
            }
            other => AppError::Database(other),
        })?;

        Ok(execution)
    }

    /// Insert on a caller-owned connection, typically inside a transaction.
    pub async fn insert_with(conn: &mut SqliteConnection, batch_id: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO test_execution (batch_id) VALUES (?)")
            .bind(batch_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_batch_id(&self, batch_id: &str) -> Result<Option<Execution>> {
        let execution = sqlx::query_as::<_, Execution>(
            "SELECT id, batch_id, created_at FROM test_execution WHERE batch_id = ?",
        )
        .bind(batch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(execution)
    }

    pub async fn get_by_batch_id(&self, batch_id: &str) -> Result<Execution> {
        self.find_by_batch_id(batch_id)
            .await?
            .ok_or_else(|| AppError::BatchNotFound(batch_id.to_string()))
    }

    pub async fn list_summaries(&self) -> Result<Vec<ExecutionSummary>> {
        let summaries = sqlx::query_as::<_, ExecutionSummary>(
            r#"
            SELECT e.id, e.batch_id, e.created_at, COUNT(d.id) AS detail_count
            FROM test_execution e
            LEFT JOIN test_detail d ON d.execution_id = e.id
            GROUP BY e.id
            ORDER BY e.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM test_execution")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::establish_connection_at;

    async fn repo() -> (tempfile::TempDir, ExecutionRepository) {
        let dir = tempfile::tempdir().unwrap();
        let pool = establish_connection_at(&dir.path().join("odm.db"))
            .await
            .unwrap();
        (dir, ExecutionRepository::new(pool))
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let (_dir, repo) = repo().await;

        let first = repo.create("jenkins-odm-1").await.unwrap();
        let second = repo.create("jenkins-odm-2").await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.batch_id, "jenkins-odm-1");

        let found = repo.get_by_batch_id("jenkins-odm-1").await.unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.created_at, first.created_at);
    }

    #[tokio::test]
    async fn duplicate_batch_id_is_rejected_without_side_effects() {
        let (_dir, repo) = repo().await;
        let original = repo.create("run-1").await.unwrap();

        let err = repo.create("run-1").await.unwrap_err();
        assert!(matches!(err, AppError::BatchAlreadyExists(ref b) if b == "run-1"));

        assert_eq!(repo.count().await.unwrap(), 1);
        let kept = repo.get_by_batch_id("run-1").await.unwrap();
        assert_eq!(kept.id, original.id);
    }

    #[tokio::test]
    async fn missing_batch_is_not_found() {
        let (_dir, repo) = repo().await;

        assert!(repo.find_by_batch_id("nope").await.unwrap().is_none());
        assert!(matches!(
            repo.get_by_batch_id("nope").await,
            Err(AppError::BatchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn summaries_list_newest_first_with_counts() {
        let (_dir, repo) = repo().await;
        let older = repo.create("a").await.unwrap();
        repo.create("b").await.unwrap();
        sqlx::query(
            "INSERT INTO test_detail (execution_id, device_serial, result) VALUES (?, 'd1', 'PASS')",
        )
        .bind(older.id)
        .execute(&repo.pool)
        .await
        .unwrap();

        let summaries = repo.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].batch_id, "b");
        assert_eq!(summaries[0].detail_count, 0);
        assert_eq!(summaries[1].detail_count, 1);
    }
}
