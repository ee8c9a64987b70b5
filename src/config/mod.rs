use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bench: BenchDefaults,
}

/// Defaults for the load generator, overridable per run from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchDefaults {
    pub success_weight: u32,
    pub fail_weight: u32,
    pub log_root: String,
}

impl Default for BenchDefaults {
    fn default() -> Self {
        Self {
            success_weight: 80,
            fail_weight: 20,
            log_root: "/app/logs".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: format!("sqlite:{}", crate::paths::DEFAULT_DATABASE_FILE),
            bench: BenchDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(file_config) = Self::from_conf_file()? {
            config.apply_file(file_config);
        }

        if let Ok(db_url) = std::env::var("DATABASE_URL") {
            config.database_url = db_url;
        }

        let root = crate::paths::install_root()?;
        config.normalize_database_url(&root)?;
        Ok(config)
    }

    /// Replaces the store location, e.g. from a command-line flag.
    pub fn override_database_url(&mut self, database_url: String) -> Result<()> {
        self.database_url = database_url;
        let root = crate::paths::install_root()?;
        self.normalize_database_url(&root)
    }

    /// Filesystem location of the store, `None` for in-memory databases.
    pub fn database_path(&self) -> Option<PathBuf> {
        let rest = self.database_url.strip_prefix("sqlite:")?;
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path.starts_with(":memory:") {
            return None;
        }
        Some(PathBuf::from(path))
    }

    fn from_conf_file() -> Result<Option<FileConfig>> {
        let path = crate::paths::conf_dir()?.join("config.json");
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file_config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Some(file_config))
    }

    fn apply_file(&mut self, file_config: FileConfig) {
        if let Some(database_url) = file_config.database_url {
            self.database_url = database_url;
        }
        if let Some(weight) = file_config.success_weight {
            self.bench.success_weight = weight;
        }
        if let Some(weight) = file_config.fail_weight {
            self.bench.fail_weight = weight;
        }
        if let Some(log_root) = file_config.log_root {
            self.bench.log_root = log_root;
        }
    }

    fn normalize_database_url(&mut self, root: &Path) -> Result<()> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }
        if !self.database_url.starts_with("sqlite:") {
            self.database_url = format!("sqlite:{}", self.database_url);
        }

        let Some(path) = self.database_path() else {
            return Ok(());
        };
        if path.is_absolute() {
            return Ok(());
        }

        let query = self
            .database_url
            .split_once('?')
            .map(|(_, q)| format!("?{q}"))
            .unwrap_or_default();
        self.database_url = format!("sqlite:{}{}", root.join(path).display(), query);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    success_weight: Option<u32>,
    fail_weight: Option<u32>,
    log_root: Option<String>,
}
