use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::open_library;
use crate::CliError;

pub(crate) fn run_stats(db: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let stats = matchbook_db::library_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query library stats: {}", e)))?;

    log::info!(
        "{}",
        "Library Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!("  Games:      {:>8}", stats.games);
    log::info!("  Extensions: {:>8}", stats.extensions);
    log::info!("  Players:    {:>8}", stats.players);
    log::info!("  Locations:  {:>8}", stats.locations);
    log::info!("  Matches:    {:>8}", stats.matches);

    Ok(())
}
