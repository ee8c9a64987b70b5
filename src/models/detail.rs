pub const UNKNOWN: &str = "UNKNOWN";

/// Device-level result row owned by an execution.
#[derive(Debug, Clone, sqlx::FromRow, PartialEq)]
pub struct Detail {
    pub id: i64,
    pub execution_id: i64,
    pub device_serial: String,
    pub result: String,
    pub log_path: String,
}

/// A detail row before it has been assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDetail {
    pub device_serial: String,
    pub result: String,
    pub log_path: String,
}

/// Per-result tally for one execution.
#[derive(Debug, Clone, sqlx::FromRow, PartialEq)]
pub struct ResultCount {
    pub result: String,
    pub count: i64,
}
