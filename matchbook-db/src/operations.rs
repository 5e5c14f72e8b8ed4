//! CRUD operations for the match library.
//!
//! These are the store calls the import pipeline's commit engine drives:
//! create game, append extension, create player, register location,
//! insert match, log the import run.

use matchbook_core::{PlayedMatch, Player};
use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Game Operations ─────────────────────────────────────────────────────────

/// Insert a new game.
pub fn insert_game(conn: &Connection, id: &str, title: &str) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO games (id, title) VALUES (?1, ?2)",
        params![id, title],
    )?;
    Ok(())
}

/// Append an extension to an existing game, bumping its updated_at.
pub fn add_extension(
    conn: &Connection,
    game_id: &str,
    extension_id: &str,
    title: &str,
) -> Result<(), OperationError> {
    let game_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM games WHERE id = ?1)",
        params![game_id],
        |row| row.get(0),
    )?;
    if !game_exists {
        return Err(OperationError::NotFound {
            entity_type: "game".to_string(),
            id: game_id.to_string(),
        });
    }

    conn.execute(
        "INSERT INTO extensions (id, game_id, title) VALUES (?1, ?2, ?3)",
        params![extension_id, game_id, title],
    )?;
    conn.execute(
        "UPDATE games SET updated_at = datetime('now') WHERE id = ?1",
        params![game_id],
    )?;
    Ok(())
}

// ── Player Operations ───────────────────────────────────────────────────────

/// Insert a new player.
pub fn insert_player(conn: &Connection, player: &Player) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO players (id, name, avatar) VALUES (?1, ?2, ?3)",
        params![player.id, player.name, player.avatar],
    )?;
    Ok(())
}

// ── Location Operations ─────────────────────────────────────────────────────

/// Register a location name. Additive: re-registering an existing name
/// is a no-op, never an error.
pub fn register_location(conn: &Connection, name: &str) -> Result<(), OperationError> {
    conn.execute(
        "INSERT OR IGNORE INTO locations (name) VALUES (?1)",
        params![name],
    )?;
    Ok(())
}

// ── Match Operations ────────────────────────────────────────────────────────

/// Insert a match with its results and extension links.
pub fn insert_match(conn: &Connection, m: &PlayedMatch) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO matches (id, game_id, date, duration, location)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![m.id, m.game_id, m.date, m.duration, m.location],
    )?;

    for result in &m.results {
        let breakdown = result
            .score_breakdown
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        conn.execute(
            "INSERT INTO match_results
                 (match_id, player_id, score, is_winner, is_starter, team_id, score_breakdown)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                m.id,
                result.player_id,
                result.score,
                result.is_winner,
                result.is_starter,
                result.team_id,
                breakdown,
            ],
        )?;
    }

    for extension_id in &m.extension_ids {
        conn.execute(
            "INSERT OR IGNORE INTO match_extensions (match_id, extension_id) VALUES (?1, ?2)",
            params![m.id, extension_id],
        )?;
    }

    Ok(())
}

// ── Import Log Operations ───────────────────────────────────────────────────

/// One recorded import run.
#[derive(Debug, Clone)]
pub struct ImportLogEntry {
    pub id: i64,
    pub source_title: String,
    pub imported_at: String,
    pub games_created: i64,
    pub extensions_created: i64,
    pub players_created: i64,
    pub locations_registered: i64,
    pub matches_imported: i64,
}

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLogEntry) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_title, imported_at, games_created,
             extensions_created, players_created, locations_registered, matches_imported)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            log.source_title,
            log.imported_at,
            log.games_created,
            log.extensions_created,
            log.players_created,
            log.locations_registered,
            log.matches_imported,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
