use chrono::NaiveDateTime;

/// One registered test batch. `created_at` is filled in by the store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Execution {
    pub id: i64,
    pub batch_id: String,
    pub created_at: NaiveDateTime,
}

/// An execution together with how many detail rows reference it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExecutionSummary {
    pub id: i64,
    pub batch_id: String,
    pub created_at: NaiveDateTime,
    pub detail_count: i64,
}
