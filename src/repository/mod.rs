mod connection;
mod detail_repository;
mod execution_repository;

pub use connection::{establish_connection, establish_connection_at, open_read_only};
pub use detail_repository::DetailRepository;
pub use execution_repository::ExecutionRepository;

pub type DbPool = sqlx::SqlitePool;
