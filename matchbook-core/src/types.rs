//! Data model types for the local match library.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Game ────────────────────────────────────────────────────────────────────

/// A board game in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub title: String,
    /// Extensions (expansions) registered on this game.
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

/// An extension (expansion) belonging to one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub id: String,
    pub title: String,
}

// ── Player ──────────────────────────────────────────────────────────────────

/// A person who participates in matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Display avatar. Defaults to the initials derived from the name.
    #[serde(default)]
    pub avatar: String,
}

// ── Match ───────────────────────────────────────────────────────────────────

/// A logged match, keyed entirely by local ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedMatch {
    pub id: String,
    pub game_id: String,
    /// Calendar date (`YYYY-MM-DD`) or, for imported matches whose source
    /// date could not be parsed, the raw source string.
    pub date: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub results: Vec<PlayedResult>,
    #[serde(default)]
    pub extension_ids: Vec<String>,
}

/// One player's outcome within a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayedResult {
    pub player_id: String,
    pub score: f64,
    pub is_winner: bool,
    pub is_starter: bool,
    /// Per-column score parts (column id → value) for games with custom
    /// score columns. Evaluated elsewhere; carried opaquely here.
    #[serde(default)]
    pub score_breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub team_id: Option<String>,
}

// ── Library ─────────────────────────────────────────────────────────────────

/// A snapshot of the user's existing catalog, as read by the import
/// pipeline's matchers. Loaded once per mapping-table rebuild, never
/// mutated by the pipeline itself.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub games: Vec<Game>,
    pub players: Vec<Player>,
    /// Known location names, verbatim as the user entered them.
    pub locations: Vec<String>,
}

impl Library {
    /// Look up a game by local id.
    pub fn game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }
}
