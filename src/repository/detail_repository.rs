use crate::error::Result;
use crate::models::{Detail, NewDetail, ResultCount};
use crate::repository::DbPool;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

// Four bound parameters per row keeps each statement well under SQLite's
// host parameter limit.
const ROWS_PER_STATEMENT: usize = 500;

#[derive(Clone)]
pub struct DetailRepository {
    pool: DbPool,
}

impl DetailRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Writes all rows for one execution in a single transaction.
    pub async fn insert_batch(&self, execution_id: i64, rows: &[NewDetail]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let written = Self::insert_with(&mut *tx, execution_id, rows).await?;
        tx.commit().await?;

        Ok(written)
    }

    /// Multi-row insert on a caller-owned connection. The caller decides when to commit.
    pub async fn insert_with(
        conn: &mut SqliteConnection,
        execution_id: i64,
        rows: &[NewDetail],
    ) -> Result<u64> {
        let mut written = 0;
        for chunk in rows.chunks(ROWS_PER_STATEMENT) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO test_detail (execution_id, device_serial, result, log_path) ",
            );
            builder.push_values(chunk, |mut b, row| {
                b.push_bind(execution_id)
                    .push_bind(row.device_serial.clone())
                    .push_bind(row.result.clone())
                    .push_bind(row.log_path.clone());
            });
            written += builder.build().execute(&mut *conn).await?.rows_affected();
        }

        Ok(written)
    }

    pub async fn list_by_execution(&self, execution_id: i64) -> Result<Vec<Detail>> {
        let details = sqlx::query_as::<_, Detail>(
            r#"
            SELECT id, execution_id, device_serial, result, log_path
            FROM test_detail
            WHERE execution_id = ?
            ORDER BY id
            "#,
        )
        .bind(execution_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    pub async fn find_by_serial_and_result(
        &self,
        device_serial: &str,
        result: &str,
    ) -> Result<Vec<Detail>> {
        let details = sqlx::query_as::<_, Detail>(
            r#"
            SELECT id, execution_id, device_serial, result, log_path
            FROM test_detail
            WHERE device_serial = ? AND result = ?
            "#,
        )
        .bind(device_serial)
        .bind(result)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    pub async fn count_by_result(&self, execution_id: i64) -> Result<Vec<ResultCount>> {
        let counts = sqlx::query_as::<_, ResultCount>(
            r#"
            SELECT result, COUNT(*) AS count
            FROM test_detail
            WHERE execution_id = ?
            GROUP BY result
            ORDER BY result
            "#,
        )
        .bind(execution_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM test_detail")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
