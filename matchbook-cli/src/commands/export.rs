//! Export a game's match history as a payload or share URL.

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use matchbook_core::Game;
use matchbook_db::Connection;
use matchbook_export::{build_export, share_url};

use super::open_library;
use crate::CliError;

pub(crate) fn run_export(
    db: Option<PathBuf>,
    game: &str,
    base_url: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let conn = open_library(db)?;
    let game = resolve_game(&conn, game)?;

    let matches = matchbook_db::matches_for_game(&conn, &game.id)
        .map_err(|e| CliError::database(format!("Failed to load matches: {}", e)))?;
    if matches.is_empty() {
        return Err(CliError::other(format!(
            "no matches recorded for '{}'",
            game.title,
        )));
    }
    let players = matchbook_db::list_players(&conn)
        .map_err(|e| CliError::database(format!("Failed to load players: {}", e)))?;

    let dataset = build_export(&game, &matches, &players);

    let rendered = match base_url {
        Some(base) => share_url(&base, &dataset)
            .map_err(|e| CliError::other(format!("Failed to encode payload: {}", e)))?,
        None => serde_json::to_string_pretty(&dataset)
            .map_err(|e| CliError::other(format!("Failed to serialize payload: {}", e)))?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            log::info!(
                "{} Exported {} matches of {} to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                matches.len(),
                game.title.if_supports_color(Stdout, |t| t.bold()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Look a game up by exact id first, then by title.
fn resolve_game(conn: &Connection, query: &str) -> Result<Game, CliError> {
    let games = matchbook_db::list_games(conn)
        .map_err(|e| CliError::database(format!("Failed to list games: {}", e)))?;

    if let Some(game) = games.iter().find(|g| g.id == query) {
        return Ok(game.clone());
    }
    matchbook_db::find_game_by_title(conn, query)
        .map_err(|e| CliError::database(format!("Failed to query games: {}", e)))?
        .ok_or_else(|| CliError::other(format!("no game matching '{}' in the library", query)))
}
