use crate::cli::report::Severity;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Batch ID already exists: {0}")]
    BatchAlreadyExists(String),

    #[error("Batch '{0}' is not registered, run init first")]
    BatchNotFound(String),

    #[error("Result file not found: {}", .0.display())]
    ResultFileMissing(PathBuf),

    #[error("Result file is not a valid result document: {}: {source}", path.display())]
    MalformedResultFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Row count mismatch: intended {intended}, found {actual}")]
    ConsistencyFault { intended: u64, actual: u64 },

    #[error("Refusing to reset the configured database at {}", .0.display())]
    UnsafeBenchTarget(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn severity(&self) -> Severity {
        match self {
            AppError::BatchAlreadyExists(_) => Severity::Warn,
            AppError::BatchNotFound(_)
            | AppError::ConsistencyFault { .. }
            | AppError::UnsafeBenchTarget(_) => Severity::Fatal,
            AppError::Database(_)
            | AppError::Io(_)
            | AppError::ResultFileMissing(_)
            | AppError::MalformedResultFile { .. }
            | AppError::InvalidArgument(_) => Severity::Error,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_taxonomy() {
        assert_eq!(
            AppError::BatchAlreadyExists("b".into()).severity(),
            Severity::Warn
        );
        assert_eq!(
            AppError::BatchNotFound("b".into()).severity(),
            Severity::Fatal
        );
        assert_eq!(
            AppError::ResultFileMissing(PathBuf::from("x.json")).severity(),
            Severity::Error
        );
        assert_eq!(
            AppError::ConsistencyFault {
                intended: 2,
                actual: 1
            }
            .severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn malformed_message_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::MalformedResultFile {
            path: PathBuf::from("results.json"),
            source,
        };
        assert!(err.to_string().contains("results.json"));
    }
}
