pub(crate) mod export;
pub(crate) mod import;
pub(crate) mod library;
pub(crate) mod log;
pub(crate) mod stats;

use std::path::PathBuf;

use matchbook_db::Connection;

use crate::config::resolve_db_path;
use crate::CliError;

/// Resolve the database path and open (or create) the library database.
pub(crate) fn open_library(db: Option<PathBuf>) -> Result<Connection, CliError> {
    let path = resolve_db_path(db)?;
    matchbook_db::open_database(&path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", path.display(), e)))
}
