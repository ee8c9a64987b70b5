use crate::error::{AppError, Result};
use crate::models::{NewDetail, ResultDocument};
use crate::repository::{DetailRepository, ExecutionRepository};
use crate::services::execution_service::validate_batch_id;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct ImportService {
    exec_repo: ExecutionRepository,
    detail_repo: DetailRepository,
}

#[derive(Debug, PartialEq)]
pub enum ImportOutcome {
    Imported {
        batch_id: String,
        execution_id: i64,
        rows: u64,
    },
    /// The document parsed but held no device records. Nothing was written.
    Empty {
        batch_id: String,
        source: PathBuf,
    },
}

impl ImportService {
    pub fn new(exec_repo: ExecutionRepository, detail_repo: DetailRepository) -> Self {
        Self {
            exec_repo,
            detail_repo,
        }
    }

    /// Loads an analyzer result file and stores one detail row per device
    /// under the execution registered for `batch_id`.
    ///
    /// Each failure ends the import with nothing written: an unregistered
    /// batch, a missing file and an unparseable file all return before the
    /// insert, and the insert itself runs in one transaction.
    pub async fn import_results(&self, batch_id: &str, source: &Path) -> Result<ImportOutcome> {
        let batch_id = validate_batch_id(batch_id)?;

        let execution = self.exec_repo.get_by_batch_id(batch_id).await?;
        tracing::debug!("Batch {} resolved to execution {}", batch_id, execution.id);

        let rows = load_details(source).await?;
        if rows.is_empty() {
            tracing::warn!("Result file {} holds no device results", source.display());
            return Ok(ImportOutcome::Empty {
                batch_id: batch_id.to_string(),
                source: source.to_path_buf(),
            });
        }

        let written = self.detail_repo.insert_batch(execution.id, &rows).await?;
        tracing::info!(
            "Imported {} result rows into batch {} (execution {})",
            written,
            batch_id,
            execution.id
        );

        Ok(ImportOutcome::Imported {
            batch_id: batch_id.to_string(),
            execution_id: execution.id,
            rows: written,
        })
    }
}

async fn load_details(source: &Path) -> Result<Vec<NewDetail>> {
    let content = tokio::fs::read(source)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::ResultFileMissing(source.to_path_buf()),
            _ => AppError::Io(e),
        })?;

    let document =
        ResultDocument::parse_slice(&content).map_err(|e| AppError::MalformedResultFile {
            path: source.to_path_buf(),
            source: e,
        })?;

    Ok(document.into_details())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Detail;
    use crate::repository::{DbPool, establish_connection_at};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        pool: DbPool,
        executions: ExecutionRepository,
        details: DetailRepository,
        service: ImportService,
    }

    impl Fixture {
        async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let pool = establish_connection_at(&dir.path().join("odm.db"))
                .await
                .unwrap();
            let executions = ExecutionRepository::new(pool.clone());
            let details = DetailRepository::new(pool.clone());
            let service = ImportService::new(executions.clone(), details.clone());
            Self {
                dir,
                pool,
                executions,
                details,
                service,
            }
        }

        fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    #[tokio::test]
    async fn imports_single_device_result() {
        let fx = Fixture::new().await;
        let execution = fx.executions.create("run-1").await.unwrap();
        let doc = fx.write(
            "result.json",
            r#"{"device_results": [{"serial": "dev-1", "status": "FAIL", "log_path": "/x.log"}]}"#,
        );

        let outcome = fx.service.import_results("run-1", &doc).await.unwrap();

        assert_eq!(
            outcome,
            ImportOutcome::Imported {
                batch_id: "run-1".into(),
                execution_id: execution.id,
                rows: 1
            }
        );
        let stored = fx.details.list_by_execution(execution.id).await.unwrap();
        assert_eq!(
            stored,
            vec![Detail {
                id: stored[0].id,
                execution_id: execution.id,
                device_serial: "dev-1".into(),
                result: "FAIL".into(),
                log_path: "/x.log".into(),
            }]
        );
    }

    #[tokio::test]
    async fn bare_list_rows_reference_the_resolved_execution() {
        let fx = Fixture::new().await;
        fx.executions.create("other").await.unwrap();
        let execution = fx.executions.create("run-2").await.unwrap();
        let doc = fx.write(
            "list.json",
            r#"[{"serial": "a", "status": "SUCCESS"}, {"status": "FAIL"}, {"serial": "c", "noise": 1}]"#,
        );

        fx.service.import_results("run-2", &doc).await.unwrap();

        let stored = fx.details.list_by_execution(execution.id).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(fx.details.count().await.unwrap(), 3);
        assert_eq!(stored[1].device_serial, "UNKNOWN");
        assert_eq!(stored[2].result, "UNKNOWN");
        assert_eq!(stored[2].log_path, "");
    }

    #[tokio::test]
    async fn unregistered_batch_writes_nothing() {
        let fx = Fixture::new().await;
        let doc = fx.write("result.json", r#"[{"serial": "dev-1"}]"#);

        let err = fx
            .service
            .import_results("missing-run", &doc)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BatchNotFound(ref b) if b == "missing-run"));
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let fx = Fixture::new().await;
        fx.executions.create("run-1").await.unwrap();

        let err = fx
            .service
            .import_results("run-1", &fx.dir.path().join("absent.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ResultFileMissing(_)));
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let fx = Fixture::new().await;
        fx.executions.create("run-1").await.unwrap();
        let doc = fx.write("broken.json", r#"{"device_results": [{"serial": "dev-1""#);

        let err = fx.service.import_results("run-1", &doc).await.unwrap_err();

        assert!(matches!(err, AppError::MalformedResultFile { .. }));
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_document_is_a_warning_not_an_abort() {
        let fx = Fixture::new().await;
        fx.executions.create("run-1").await.unwrap();

        for (name, content) in [("a.json", "[]"), ("b.json", "{}"), ("c.json", r#"{"device_results": []}"#)] {
            let doc = fx.write(name, content);
            let outcome = fx.service.import_results("run-1", &doc).await.unwrap();
            assert!(matches!(outcome, ImportOutcome::Empty { .. }));
        }
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_imports_append() {
        let fx = Fixture::new().await;
        let execution = fx.executions.create("run-1").await.unwrap();
        let doc = fx.write("result.json", r#"[{"serial": "a"}, {"serial": "b"}]"#);

        fx.service.import_results("run-1", &doc).await.unwrap();
        fx.service.import_results("run-1", &doc).await.unwrap();

        assert_eq!(
            fx.details.list_by_execution(execution.id).await.unwrap().len(),
            4
        );
    }

    #[tokio::test]
    async fn numeric_serials_are_imported_as_text() {
        let fx = Fixture::new().await;
        let execution = fx.executions.create("run-1").await.unwrap();
        let doc = fx.write(
            "result.json",
            r#"{"device_results":[{"serial":"dev-1","status":"PASS"},{"serial":123456,"status":"FAIL","duration":3}]}"#,
        );

        let outcome = fx.service.import_results("run-1", &doc).await.unwrap();

        assert!(matches!(outcome, ImportOutcome::Imported { rows: 2, .. }));
        let stored = fx.details.list_by_execution(execution.id).await.unwrap();
        assert_eq!(stored[1].device_serial, "123456");
        assert_eq!(stored[1].result, "FAIL");
    }

    #[tokio::test]
    async fn undecodable_bytes_are_malformed() {
        let fx = Fixture::new().await;
        fx.executions.create("run-1").await.unwrap();
        let doc = fx.write("binary.json", [0xff, 0xfe]);

        let err = fx.service.import_results("run-1", &doc).await.unwrap_err();

        assert!(matches!(err, AppError::MalformedResultFile { ref path, .. } if *path == doc));
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn large_import_is_all_or_nothing() {
        let fx = Fixture::new().await;
        fx.executions.create("run-1").await.unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_marked BEFORE INSERT ON test_detail \
             WHEN NEW.device_serial = 'boom' \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&fx.pool)
        .await
        .unwrap();
        let mut records: Vec<String> = (0..1200)
            .map(|n| format!(r#"{{"serial": "device_{n:04}", "status": "SUCCESS"}}"#))
            .collect();
        records[1100] = r#"{"serial": "boom", "status": "FAIL"}"#.to_string();
        let doc = fx.write("large.json", format!("[{}]", records.join(",")));

        let err = fx.service.import_results("run-1", &doc).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(fx.details.count().await.unwrap(), 0);
    }
}
