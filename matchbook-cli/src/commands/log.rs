use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::open_library;
use crate::CliError;

pub(crate) fn run_log(db: Option<PathBuf>) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let entries = matchbook_db::list_import_logs(&conn)
        .map_err(|e| CliError::database(format!("Failed to query import history: {}", e)))?;

    if entries.is_empty() {
        log::info!(
            "{}",
            "No imports recorded yet.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for entry in &entries {
        log::info!(
            "{} {} {}",
            entry.imported_at.if_supports_color(Stdout, |t| t.dimmed()),
            entry.source_title.if_supports_color(Stdout, |t| t.bold()),
            format!(
                "({} matches, {} games, {} extensions, {} players, {} locations created)",
                entry.matches_imported,
                entry.games_created,
                entry.extensions_created,
                entry.players_created,
                entry.locations_registered,
            )
            .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
