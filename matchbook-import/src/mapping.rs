//! Per-dataset reconciliation decisions.
//!
//! One set of tables exists per dataset being imported. They are created
//! when the queue loads the dataset, mutated only through the pipeline's
//! step handlers, consumed once by the commit engine, and rebuilt from
//! scratch for the next dataset — decisions never leak across datasets.

use std::collections::BTreeMap;

/// Decision for the dataset's source game.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GameMapping {
    /// No decision yet; blocks leaving the game step.
    #[default]
    Unresolved,
    /// Import into an existing local game.
    UseExisting(String),
    /// Create a new local game at commit time.
    CreateNew(GameDraft),
}

impl GameMapping {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, GameMapping::Unresolved)
    }
}

/// Configuration for a game created during commit. Filled in by the
/// game-creation form collaborator; only the parts the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDraft {
    pub title: String,
}

/// Decision for one foreign extension id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionMapping {
    /// No decision yet; blocks leaving the game step.
    #[default]
    Unresolved,
    /// Map to an existing extension of the target game.
    UseExisting(String),
    /// Drop every reference to this extension.
    Ignore,
    /// Create a configured custom extension at commit time. Keyed by
    /// foreign id, so revisiting the step preserves the configuration.
    Customized(ExtensionDraft),
}

impl ExtensionMapping {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ExtensionMapping::Unresolved)
    }
}

/// Configuration for an extension created during commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDraft {
    pub title: String,
}

/// Decision for one foreign location name. Never unresolved: a miss
/// defaults to creating the location under its foreign name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationMapping {
    /// Map to an existing local location name.
    UseExisting(String),
    /// Register the foreign name verbatim.
    CreateNew,
    /// Register a user-typed name instead. Empty text degrades to the
    /// foreign name at commit; it never blocks advancement.
    Custom(String),
}

/// Decision for one foreign player id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerMapping {
    /// No decision yet; blocks commit.
    #[default]
    Unresolved,
    /// Map to an existing local player.
    UseExisting(String),
    /// Create a local player at commit time.
    CreateNew,
}

impl PlayerMapping {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, PlayerMapping::Unresolved)
    }
}

/// The four independent mapping tables for one dataset, keyed by foreign
/// id (extensions, players) or foreign name (locations).
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    pub game: GameMapping,
    pub extensions: BTreeMap<String, ExtensionMapping>,
    pub locations: BTreeMap<String, LocationMapping>,
    pub players: BTreeMap<String, PlayerMapping>,
}

impl MappingTables {
    /// Count extension entries still awaiting a decision.
    pub fn unresolved_extensions(&self) -> usize {
        self.extensions
            .values()
            .filter(|m| !m.is_resolved())
            .count()
    }

    /// Count player entries still awaiting a decision.
    pub fn unresolved_players(&self) -> usize {
        self.players.values().filter(|m| !m.is_resolved()).count()
    }
}
