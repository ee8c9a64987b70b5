use crate::error::Result;
use crate::repository::DbPool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS test_execution (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        batch_id TEXT NOT NULL UNIQUE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS test_detail (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        execution_id INTEGER NOT NULL,
        device_serial TEXT NOT NULL,
        result TEXT NOT NULL,
        log_path TEXT NOT NULL DEFAULT '',
        FOREIGN KEY (execution_id) REFERENCES test_execution(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_test_detail_execution_id ON test_detail(execution_id);
    CREATE INDEX IF NOT EXISTS idx_test_detail_serial_result ON test_detail(device_serial, result);
"#;

pub async fn establish_connection(database_url: &str) -> Result<DbPool> {
    // Ensure the database URL has the correct format
    let db_url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{}", database_url)
    };

    connect(SqliteConnectOptions::from_str(&db_url)?).await
}

pub async fn establish_connection_at(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    connect(SqliteConnectOptions::new().filename(path)).await
}

/// Opens an existing store without writing to it. The schema is not touched.
pub async fn open_read_only(path: &Path) -> Result<DbPool> {
    let options = SqliteConnectOptions::new().filename(path).read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

async fn connect(options: SqliteConnectOptions) -> Result<DbPool> {
    let options = options.create_if_missing(true).foreign_keys(true);

    // One connection: the store has a single writer and in-memory databases
    // only live as long as their connection.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Creates both tables and their indexes. A no-op on a store that already has them.
async fn ensure_schema(pool: &DbPool) -> Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    tracing::debug!("Schema ensured");
    Ok(())
}
