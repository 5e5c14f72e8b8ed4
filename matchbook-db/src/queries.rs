//! Read queries for the match library.

use std::collections::BTreeMap;

use matchbook_core::{Extension, Game, Library, PlayedMatch, PlayedResult, Player};
use rusqlite::{params, Connection};

use crate::operations::{ImportLogEntry, OperationError};

// ── Game Lookups ────────────────────────────────────────────────────────────

/// List all games with their extensions, ordered by title.
pub fn list_games(conn: &Connection) -> Result<Vec<Game>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, title FROM games ORDER BY title")?;
    let mut games = stmt
        .query_map([], |row| {
            Ok(Game {
                id: row.get(0)?,
                title: row.get(1)?,
                extensions: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut ext_stmt =
        conn.prepare("SELECT id, title FROM extensions WHERE game_id = ?1 ORDER BY title")?;
    for game in &mut games {
        game.extensions = ext_stmt
            .query_map(params![game.id], |row| {
                Ok(Extension {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(games)
}

/// Find a game by exact title (case-insensitive), extensions loaded.
pub fn find_game_by_title(
    conn: &Connection,
    title: &str,
) -> Result<Option<Game>, OperationError> {
    let result = conn.query_row(
        "SELECT id, title FROM games WHERE LOWER(title) = LOWER(?1) LIMIT 1",
        params![title],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    );
    let (id, title) = match result {
        Ok(pair) => pair,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut stmt =
        conn.prepare("SELECT id, title FROM extensions WHERE game_id = ?1 ORDER BY title")?;
    let extensions = stmt
        .query_map(params![id], |row| {
            Ok(Extension {
                id: row.get(0)?,
                title: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Game {
        id,
        title,
        extensions,
    }))
}

// ── Player / Location Lookups ───────────────────────────────────────────────

/// List all players, ordered by name.
pub fn list_players(conn: &Connection) -> Result<Vec<Player>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name, avatar FROM players ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Player {
            id: row.get(0)?,
            name: row.get(1)?,
            avatar: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// List all registered location names, ordered by name.
pub fn list_locations(conn: &Connection) -> Result<Vec<String>, OperationError> {
    let mut stmt = conn.prepare("SELECT name FROM locations ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Load the full library snapshot the import pipeline matches against.
pub fn load_library(conn: &Connection) -> Result<Library, OperationError> {
    Ok(Library {
        games: list_games(conn)?,
        players: list_players(conn)?,
        locations: list_locations(conn)?,
    })
}

// ── Match Lookups ───────────────────────────────────────────────────────────

/// List all matches for a game, results and extension links loaded,
/// ordered by date.
pub fn matches_for_game(
    conn: &Connection,
    game_id: &str,
) -> Result<Vec<PlayedMatch>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, game_id, date, duration, location
         FROM matches WHERE game_id = ?1 ORDER BY date, id",
    )?;
    let mut matches = stmt
        .query_map(params![game_id], |row| {
            Ok(PlayedMatch {
                id: row.get(0)?,
                game_id: row.get(1)?,
                date: row.get(2)?,
                duration: row.get(3)?,
                location: row.get(4)?,
                results: Vec::new(),
                extension_ids: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut result_stmt = conn.prepare(
        "SELECT player_id, score, is_winner, is_starter, team_id, score_breakdown
         FROM match_results WHERE match_id = ?1",
    )?;
    let mut ext_stmt =
        conn.prepare("SELECT extension_id FROM match_extensions WHERE match_id = ?1")?;

    for m in &mut matches {
        m.results = result_stmt
            .query_map(params![m.id], |row| {
                let breakdown: Option<String> = row.get(5)?;
                Ok(PlayedResult {
                    player_id: row.get(0)?,
                    score: row.get(1)?,
                    is_winner: row.get(2)?,
                    is_starter: row.get(3)?,
                    team_id: row.get(4)?,
                    score_breakdown: breakdown.and_then(|json| parse_breakdown(&json)),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        m.extension_ids = ext_stmt
            .query_map(params![m.id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(matches)
}

/// Deserialize a stored score breakdown, dropping unreadable values.
fn parse_breakdown(json: &str) -> Option<BTreeMap<String, f64>> {
    match serde_json::from_str(json) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("Dropping unreadable score breakdown: {e}");
            None
        }
    }
}

// ── Stats ───────────────────────────────────────────────────────────────────

/// Row counts of the whole library.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub games: i64,
    pub extensions: i64,
    pub players: i64,
    pub locations: i64,
    pub matches: i64,
}

/// Count rows across the library tables.
pub fn library_stats(conn: &Connection) -> Result<LibraryStats, OperationError> {
    let count = |table: &str| -> Result<i64, rusqlite::Error> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
    };

    Ok(LibraryStats {
        games: count("games")?,
        extensions: count("extensions")?,
        players: count("players")?,
        locations: count("locations")?,
        matches: count("matches")?,
    })
}

/// List recorded import runs, newest first.
pub fn list_import_logs(conn: &Connection) -> Result<Vec<ImportLogEntry>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, source_title, imported_at, games_created, extensions_created,
                players_created, locations_registered, matches_imported
         FROM import_log ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLogEntry {
            id: row.get(0)?,
            source_title: row.get(1)?,
            imported_at: row.get(2)?,
            games_created: row.get(3)?,
            extensions_created: row.get(4)?,
            players_created: row.get(5)?,
            locations_registered: row.get(6)?,
            matches_imported: row.get(7)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
