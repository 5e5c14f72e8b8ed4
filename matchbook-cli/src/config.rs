//! Database location resolution.
//!
//! Precedence: `--db` flag, then the `MATCHBOOK_DB` environment variable,
//! then the platform data directory.

use std::path::PathBuf;

use crate::CliError;

pub(crate) const DB_ENV_VAR: &str = "MATCHBOOK_DB";

/// Resolve the library database path from the flag, environment, or the
/// platform default, creating parent directories as needed.
pub(crate) fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let path = match flag {
        Some(p) => p,
        None => match std::env::var_os(DB_ENV_VAR) {
            Some(v) => PathBuf::from(v),
            None => default_db_path()?,
        },
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(path)
}

fn default_db_path() -> Result<PathBuf, CliError> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| CliError::config("could not determine the platform data directory"))?;
    Ok(data_dir.join("matchbook").join("matchbook.db"))
}
