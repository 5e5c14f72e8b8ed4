//! The commit/remap engine.
//!
//! Given one fully-resolved dataset and its mapping tables, create every
//! missing local entity exactly once, build the foreign→local id
//! translation tables, rewrite each match, and hand it to the store.
//! Creation order matters: the game first (later steps need its id),
//! then extensions, players, locations, then the matches themselves.
//!
//! The loop is intentionally not wrapped in a transaction: every store
//! call is an independent atomic insert, and a mid-loop failure leaves
//! prior insertions in place. Re-running the import with "use existing"
//! mappings converges instead of duplicating.

use std::collections::HashMap;

use matchbook_core::util::default_avatar;
use matchbook_core::{fresh_id, id, PlayedMatch, PlayedResult, Player};
use matchbook_db::operations::{self, ImportLogEntry, OperationError};
use matchbook_export::ExportDataset;
use rusqlite::Connection;
use thiserror::Error;

use crate::mapping::{
    ExtensionMapping, GameMapping, LocationMapping, MappingTables, PlayerMapping,
};

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("game mapping is unresolved")]
    UnresolvedGame,
    #[error("extension '{0}' has no mapping decision")]
    UnresolvedExtension(String),
    #[error("player '{0}' has no mapping decision")]
    UnresolvedPlayer(String),
    #[error("target game '{0}' does not exist")]
    MissingGame(String),
    #[error("pipeline is not at the commit step")]
    NotReady,
}

/// Counters from one dataset commit.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitStats {
    pub games_created: u64,
    pub extensions_created: u64,
    pub players_created: u64,
    pub locations_registered: u64,
    pub matches_imported: u64,
    /// Results dropped because their player id violated the dataset
    /// invariant (no entry in the player table).
    pub results_skipped: u64,
    /// Extension references dropped from matches (ignored or unmapped).
    pub extension_refs_dropped: u64,
}

/// Result of committing one dataset.
#[derive(Debug)]
pub struct CommitOutcome {
    /// The resolved local game id all matches were rewritten to.
    pub game_id: String,
    pub stats: CommitStats,
}

/// Commit one resolved dataset against the store.
///
/// Every created entity is driven by a mapping table entry — nothing is
/// created speculatively, and each entry creates at most one entity no
/// matter how many matches reference it.
pub fn commit_dataset(
    conn: &Connection,
    dataset: &ExportDataset,
    tables: &MappingTables,
) -> Result<CommitOutcome, CommitError> {
    let mut stats = CommitStats::default();

    // 1. Resolve the target game. This is the only point a new game
    //    actually gets its id.
    let game_id = match &tables.game {
        GameMapping::Unresolved => return Err(CommitError::UnresolvedGame),
        GameMapping::UseExisting(id) => {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM games WHERE id = ?1)",
                    [id.as_str()],
                    |row| row.get(0),
                )
                .map_err(OperationError::from)?;
            if !exists {
                return Err(CommitError::MissingGame(id.clone()));
            }
            id.clone()
        }
        GameMapping::CreateNew(draft) => {
            let id = id::game_id(&draft.title);
            operations::insert_game(conn, &id, &draft.title)?;
            stats.games_created += 1;
            id
        }
    };

    // 2. Materialize extensions and build the translation table.
    //    None = drop every reference to this foreign id.
    let mut extension_ids: HashMap<&str, Option<String>> = HashMap::new();
    for extension in &dataset.extensions {
        let resolved = match tables.extensions.get(&extension.id) {
            None | Some(ExtensionMapping::Unresolved) => {
                return Err(CommitError::UnresolvedExtension(extension.id.clone()));
            }
            Some(ExtensionMapping::UseExisting(local)) => Some(local.clone()),
            Some(ExtensionMapping::Ignore) => None,
            Some(ExtensionMapping::Customized(draft)) => {
                let local = id::extension_id(&game_id, &draft.title);
                operations::add_extension(conn, &game_id, &local, &draft.title)?;
                stats.extensions_created += 1;
                Some(local)
            }
        };
        extension_ids.insert(extension.id.as_str(), resolved);
    }

    // 3. Materialize players.
    let mut player_ids: HashMap<&str, String> = HashMap::new();
    for player in &dataset.players {
        let local = match tables.players.get(&player.id) {
            None | Some(PlayerMapping::Unresolved) => {
                return Err(CommitError::UnresolvedPlayer(player.id.clone()));
            }
            Some(PlayerMapping::UseExisting(local)) => local.clone(),
            Some(PlayerMapping::CreateNew) => {
                let created = Player {
                    id: fresh_id(),
                    name: player.name.clone(),
                    avatar: default_avatar(&player.name),
                };
                operations::insert_player(conn, &created)?;
                stats.players_created += 1;
                created.id
            }
        };
        player_ids.insert(player.id.as_str(), local);
    }

    // 4. Materialize locations.
    let mut location_names: HashMap<&str, String> = HashMap::new();
    for (foreign_name, mapping) in &tables.locations {
        let local = match mapping {
            LocationMapping::UseExisting(local) => local.clone(),
            LocationMapping::CreateNew => {
                operations::register_location(conn, foreign_name)?;
                stats.locations_registered += 1;
                foreign_name.clone()
            }
            LocationMapping::Custom(text) => {
                // Empty custom text degrades to the foreign name.
                let name = if text.trim().is_empty() {
                    foreign_name.clone()
                } else {
                    text.trim().to_string()
                };
                operations::register_location(conn, &name)?;
                stats.locations_registered += 1;
                name
            }
        };
        location_names.insert(foreign_name.as_str(), local);
    }

    // 5. Rewrite and insert every match.
    for m in &dataset.matches {
        let location = m.location.as_ref().map(|foreign| {
            location_names
                .get(foreign.as_str())
                .cloned()
                .unwrap_or_else(|| foreign.clone())
        });

        let mut extension_refs = Vec::new();
        for foreign in &m.extension_ids {
            match extension_ids.get(foreign.as_str()) {
                Some(Some(local)) => extension_refs.push(local.clone()),
                _ => stats.extension_refs_dropped += 1,
            }
        }

        let mut results = Vec::new();
        for r in &m.results {
            match player_ids.get(r.player_id.as_str()) {
                Some(local) => results.push(PlayedResult {
                    player_id: local.clone(),
                    score: r.score,
                    is_winner: r.is_winner,
                    is_starter: r.is_starter,
                    score_breakdown: r.score_breakdown.clone(),
                    team_id: r.team_id.clone(),
                }),
                None => {
                    log::warn!(
                        "Skipping result for unmapped player id '{}' in match '{}'",
                        r.player_id,
                        m.id
                    );
                    stats.results_skipped += 1;
                }
            }
        }

        let rewritten = PlayedMatch {
            id: fresh_id(),
            game_id: game_id.clone(),
            date: m.date.clone(),
            duration: m.duration.clone(),
            location,
            results,
            extension_ids: extension_refs,
        };
        operations::insert_match(conn, &rewritten)?;
        stats.matches_imported += 1;
    }

    Ok(CommitOutcome { game_id, stats })
}

/// Record a committed import run in the import log.
pub fn log_import(
    conn: &Connection,
    source_title: &str,
    stats: &CommitStats,
) -> Result<i64, CommitError> {
    let entry = ImportLogEntry {
        id: 0,
        source_title: source_title.to_string(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        games_created: stats.games_created as i64,
        extensions_created: stats.extensions_created as i64,
        players_created: stats.players_created as i64,
        locations_registered: stats.locations_registered as i64,
        matches_imported: stats.matches_imported as i64,
    };
    Ok(operations::insert_import_log(conn, &entry)?)
}
