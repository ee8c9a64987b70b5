use crate::error::{AppError, Result};
use std::path::PathBuf;

const CONF_DIR: &str = "conf";
const HOME_ENV: &str = "ODM_LEDGER_HOME";

pub const DEFAULT_DATABASE_FILE: &str = "odm.db";

/// Root that relative store paths and the config directory hang off.
/// `ODM_LEDGER_HOME` wins; otherwise the working directory.
pub fn install_root() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if home.trim().is_empty() {
            return Err(AppError::InvalidArgument(format!(
                "{HOME_ENV} is set but empty"
            )));
        }
        return Ok(PathBuf::from(home));
    }

    Ok(std::env::current_dir()?)
}

pub fn conf_dir() -> Result<PathBuf> {
    Ok(install_root()?.join(CONF_DIR))
}

/// True when both paths name the same file, whether or not it exists yet.
pub fn same_location(a: &std::path::Path, b: &std::path::Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => match (std::path::absolute(a), std::path::absolute(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => a == b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_location_resolves_relative_segments() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("odm.db");
        std::fs::write(&file, b"").unwrap();

        let roundabout = dir.path().join("sub").join("..").join("odm.db");
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        assert!(same_location(&file, &roundabout));
        assert!(!same_location(&file, &dir.path().join("bench.db")));
    }
}
