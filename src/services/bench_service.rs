use crate::error::{AppError, Result};
use crate::models::{Detail, NewDetail};
use crate::paths;
use crate::repository::{
    DetailRepository, ExecutionRepository, establish_connection_at, open_read_only,
};
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const STATUSES: [&str; 2] = ["SUCCESS", "FAIL"];
const PROGRESS_EVERY: u32 = 100;

/// Parameters for one synthetic load run.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub batch_count: u32,
    pub devices_per_batch: u32,
    pub success_weight: u32,
    pub fail_weight: u32,
    pub log_root: String,
    /// Fixes the status draw so two runs produce identical stores.
    pub seed: Option<u64>,
}

impl LoadPlan {
    pub fn intended_rows(&self) -> u64 {
        u64::from(self.batch_count) * u64::from(self.devices_per_batch)
    }

    fn status_distribution(&self) -> Result<WeightedIndex<u32>> {
        WeightedIndex::new([self.success_weight, self.fail_weight]).map_err(|e| {
            AppError::InvalidArgument(format!("Invalid status weights: {}", e))
        })
    }
}

#[derive(Debug)]
pub struct LoadReport {
    pub batches: u64,
    pub intended_rows: u64,
    pub actual_rows: u64,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct QueryReport {
    pub device_serial: String,
    pub result: String,
    pub matches: Vec<Detail>,
    pub elapsed: Duration,
}

impl QueryReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Load generator and lookup timer. Works on its own store file, never on
/// the one imports go to.
pub struct BenchService {
    target: PathBuf,
    protected: Option<PathBuf>,
}

impl BenchService {
    /// `protected` is the production store; `generate_load` refuses to reset it.
    pub fn new(target: PathBuf, protected: Option<PathBuf>) -> Self {
        Self { target, protected }
    }

    /// Wipes the target store, then writes `batch_count` executions with
    /// `devices_per_batch` details each inside one transaction.
    pub async fn generate_load(&self, plan: &LoadPlan) -> Result<LoadReport> {
        if plan.batch_count == 0 || plan.devices_per_batch == 0 {
            return Err(AppError::InvalidArgument(
                "Batch count and devices per batch must be positive".to_string(),
            ));
        }
        let statuses = plan.status_distribution()?;
        self.check_target()?;

        let intended_rows = plan.intended_rows();
        tracing::debug!(
            "Planning {} batches of {} devices ({} rows)",
            plan.batch_count,
            plan.devices_per_batch,
            intended_rows
        );

        reset_store(&self.target)?;
        let pool = establish_connection_at(&self.target).await?;
        let mut rng = match plan.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let devices: Vec<String> = (1..=plan.devices_per_batch)
            .map(|n| format!("device_{n:03}"))
            .collect();

        let started = Instant::now();
        let mut tx = pool.begin().await?;
        let mut inserted: u64 = 0;

        for i in 0..plan.batch_count {
            let batch_id = format!("stress-test-run-{i}");
            let execution_id = ExecutionRepository::insert_with(&mut *tx, &batch_id).await?;

            let rows: Vec<NewDetail> = devices
                .iter()
                .map(|device| NewDetail {
                    device_serial: device.clone(),
                    result: STATUSES[statuses.sample(&mut rng)].to_string(),
                    log_path: format!("{}/{}/{}.log", plan.log_root, batch_id, device),
                })
                .collect();
            inserted += DetailRepository::insert_with(&mut *tx, execution_id, &rows).await?;

            if i == 0 {
                tracing::debug!(
                    "First batch written: execution_id={}, {} rows",
                    execution_id,
                    rows.len()
                );
            }
            if i > 0 && i % PROGRESS_EVERY == 0 {
                tracing::debug!("Processed {} batches ({} rows)", i, inserted);
            }
        }

        tx.commit().await?;

        let actual_rows = count_u64(DetailRepository::new(pool.clone()).count().await?);
        let batches = count_u64(ExecutionRepository::new(pool.clone()).count().await?);
        let elapsed = started.elapsed();
        pool.close().await;

        verify_count("rows", intended_rows, actual_rows)?;
        verify_count("batches", u64::from(plan.batch_count), batches)?;

        tracing::info!(
            "Generated {} rows in {:.2}s",
            actual_rows,
            elapsed.as_secs_f64()
        );
        Ok(LoadReport {
            batches,
            intended_rows,
            actual_rows,
            elapsed,
        })
    }

    /// Times one `device_serial` + `result` lookup. Read-only and repeatable.
    pub async fn benchmark_query(&self, device_serial: &str, result: &str) -> Result<QueryReport> {
        if !self.target.is_file() {
            return Err(AppError::InvalidArgument(format!(
                "Benchmark store {} does not exist, run a load first",
                self.target.display()
            )));
        }

        let pool = open_read_only(&self.target).await?;
        let details = DetailRepository::new(pool.clone());

        let started = Instant::now();
        let matches = details
            .find_by_serial_and_result(device_serial, result)
            .await?;
        let elapsed = started.elapsed();
        pool.close().await;

        tracing::debug!("Query matched {} rows", matches.len());
        Ok(QueryReport {
            device_serial: device_serial.to_string(),
            result: result.to_string(),
            matches,
            elapsed,
        })
    }

    fn check_target(&self) -> Result<()> {
        match &self.protected {
            Some(protected) if paths::same_location(&self.target, protected) => {
                Err(AppError::UnsafeBenchTarget(self.target.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Compares what the generator wrote with what the store reports after commit.
fn verify_count(what: &str, intended: u64, actual: u64) -> Result<()> {
    if intended == actual {
        return Ok(());
    }
    tracing::error!("Inserted {} {} but the store holds {}", intended, what, actual);
    Err(AppError::ConsistencyFault { intended, actual })
}

fn count_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Removes the store file and the journal files SQLite keeps beside it.
fn reset_store(path: &Path) -> Result<()> {
    let mut files = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm", "-journal"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        files.push(PathBuf::from(name));
    }

    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => tracing::debug!("Removed {}", file.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::Io(e)),
        }
    }
    Ok(())
}
