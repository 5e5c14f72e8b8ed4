//! The dataset queue and mapping state machine.
//!
//! The pipeline owns the ordered list of datasets the user chose to
//! import and walks each one through a fixed sequence of confirmation
//! steps: game (with its extensions) → locations → players → commit.
//! A single `advance` action per step either moves forward or returns a
//! validation message; guards never panic and never touch the store.

use matchbook_core::{Extension, Library};
use matchbook_export::ExportDataset;
use rusqlite::Connection;
use thiserror::Error;

use crate::commit::{commit_dataset, CommitError, CommitOutcome};
use crate::mapping::{
    ExtensionMapping, GameMapping, LocationMapping, MappingTables, PlayerMapping,
};
use crate::matcher;

/// Where the pipeline currently is for the dataset in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    /// Confirm the target game and resolve its extension entries.
    GameMapping,
    /// Confirm location mappings (skipped when the dataset has none).
    LocationMapping,
    /// Confirm player mappings.
    PlayerMapping,
    /// Ready to commit the current dataset.
    Commit,
    /// All selected datasets are committed.
    Done,
}

/// A step guard rejected the advance. Reported inline at the current
/// step; the pipeline stays where it is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("choose an existing game or configure a new one first")]
    GameUnresolved,
    #[error("{0} extension(s) still need a decision")]
    ExtensionsUnresolved(usize),
    #[error("{0} player(s) still need a mapping")]
    PlayersUnresolved(usize),
    #[error("the current dataset must be committed before advancing")]
    CommitPending,
    #[error("all datasets have been imported")]
    Finished,
}

/// The import pipeline for one user-selected batch of datasets.
pub struct ImportPipeline {
    datasets: Vec<ExportDataset>,
    current: usize,
    step: PipelineStep,
    mappings: MappingTables,
    /// Distinct locations referenced by the current dataset, rebuilt on
    /// every dataset load.
    unique_locations: Vec<String>,
}

impl ImportPipeline {
    /// Start a pipeline over the datasets the user selected, loading the
    /// first one. Returns `None` when nothing was selected.
    pub fn new(datasets: Vec<ExportDataset>, library: &Library) -> Option<Self> {
        if datasets.is_empty() {
            return None;
        }
        let mut pipeline = Self {
            datasets,
            current: 0,
            step: PipelineStep::GameMapping,
            mappings: MappingTables::default(),
            unique_locations: Vec::new(),
        };
        pipeline.load_current(library);
        Some(pipeline)
    }

    // ── Queue controller ────────────────────────────────────────────────────

    /// The dataset currently being reconciled.
    pub fn current_dataset(&self) -> &ExportDataset {
        &self.datasets[self.current.min(self.datasets.len() - 1)]
    }

    /// Current position as `(index, count)`.
    pub fn position(&self) -> (usize, usize) {
        (self.current, self.datasets.len())
    }

    /// True when the dataset in progress is the last one queued.
    pub fn is_last_dataset(&self) -> bool {
        self.current + 1 >= self.datasets.len()
    }

    /// Rebuild all per-dataset state for the dataset at `self.current`.
    ///
    /// This full reset is what keeps datasets isolated: no mapping made
    /// for a previous dataset survives into this one.
    fn load_current(&mut self, library: &Library) {
        self.mappings = MappingTables::default();
        self.unique_locations = Vec::new();
        self.step = PipelineStep::GameMapping;

        let game_mapping = matcher::match_game(&self.datasets[self.current].source_game_title, &library.games)
            .map(|g| GameMapping::UseExisting(g.id.clone()))
            .unwrap_or_default();
        self.set_game_mapping(game_mapping, library);
    }

    // ── State access ────────────────────────────────────────────────────────

    pub fn step(&self) -> PipelineStep {
        self.step
    }

    pub fn mappings(&self) -> &MappingTables {
        &self.mappings
    }

    /// Locations the current dataset references, in first-seen order.
    pub fn unique_locations(&self) -> &[String] {
        &self.unique_locations
    }

    // ── Step handlers ───────────────────────────────────────────────────────

    /// Set the game decision and re-run extension auto-matching for
    /// entries that are still unresolved. Entries the user already
    /// confirmed are never clobbered.
    pub fn set_game_mapping(&mut self, mapping: GameMapping, library: &Library) {
        self.mappings.game = mapping;

        let candidates: Vec<Extension> = match &self.mappings.game {
            GameMapping::UseExisting(id) => library
                .game(id)
                .map(|g| g.extensions.clone())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let foreign: Vec<(String, String)> = self.datasets[self.current]
            .extensions
            .iter()
            .map(|e| (e.id.clone(), e.title.clone()))
            .collect();

        for (foreign_id, title) in foreign {
            let entry = self.mappings.extensions.entry(foreign_id).or_default();
            if !entry.is_resolved() {
                *entry = matcher::match_extension(&title, &candidates)
                    .map(|hit| ExtensionMapping::UseExisting(hit.id.clone()))
                    .unwrap_or_default();
            }
        }
    }

    /// Set the decision for one foreign extension id.
    pub fn set_extension_mapping(&mut self, foreign_id: &str, mapping: ExtensionMapping) {
        self.mappings
            .extensions
            .insert(foreign_id.to_string(), mapping);
    }

    /// Set the decision for one foreign location name.
    pub fn set_location_mapping(&mut self, foreign_name: &str, mapping: LocationMapping) {
        self.mappings
            .locations
            .insert(foreign_name.to_string(), mapping);
    }

    /// Set the decision for one foreign player id.
    pub fn set_player_mapping(&mut self, foreign_id: &str, mapping: PlayerMapping) {
        self.mappings
            .players
            .insert(foreign_id.to_string(), mapping);
    }

    // ── Transitions ─────────────────────────────────────────────────────────

    /// Run the current step's guard and advance on success.
    ///
    /// On failure the pipeline stays on the current step and nothing is
    /// created anywhere; the error is the inline message to display.
    pub fn advance(&mut self, library: &Library) -> Result<PipelineStep, ValidationError> {
        match self.step {
            PipelineStep::GameMapping => {
                if !self.mappings.game.is_resolved() {
                    return Err(ValidationError::GameUnresolved);
                }
                let unresolved = self.mappings.unresolved_extensions();
                if unresolved > 0 {
                    return Err(ValidationError::ExtensionsUnresolved(unresolved));
                }

                self.unique_locations = self.current_dataset().unique_locations();
                if self.unique_locations.is_empty() {
                    self.enter_player_step(library);
                } else {
                    self.enter_location_step(library);
                }
            }
            PipelineStep::LocationMapping => {
                // Unconditional once visited; empty custom text degrades
                // to the foreign name at commit time.
                self.enter_player_step(library);
            }
            PipelineStep::PlayerMapping => {
                let unresolved = self.mappings.unresolved_players();
                if unresolved > 0 {
                    return Err(ValidationError::PlayersUnresolved(unresolved));
                }
                self.step = PipelineStep::Commit;
            }
            PipelineStep::Commit => return Err(ValidationError::CommitPending),
            PipelineStep::Done => return Err(ValidationError::Finished),
        }
        Ok(self.step)
    }

    /// Compute location pre-fills (on step entry, once per dataset).
    fn enter_location_step(&mut self, library: &Library) {
        for foreign_name in &self.unique_locations {
            let mapping = matcher::match_location(foreign_name, &library.locations)
                .map(|local| LocationMapping::UseExisting(local.to_string()))
                .unwrap_or(LocationMapping::CreateNew);
            self.mappings
                .locations
                .entry(foreign_name.clone())
                .or_insert(mapping);
        }
        self.step = PipelineStep::LocationMapping;
    }

    /// Compute player pre-fills (on step entry, once per dataset).
    fn enter_player_step(&mut self, library: &Library) {
        let foreign: Vec<(String, String)> = self.current_dataset()
            .players
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();

        for (foreign_id, name) in foreign {
            let mapping = matcher::match_player(&name, &library.players)
                .map(|hit| PlayerMapping::UseExisting(hit.id.clone()))
                .unwrap_or_default();
            self.mappings.players.entry(foreign_id).or_insert(mapping);
        }
        self.step = PipelineStep::PlayerMapping;
    }

    /// Commit the current dataset and move on: the next queued dataset
    /// (all per-dataset state rebuilt) or `Done`.
    ///
    /// `library` should be a fresh snapshot; it seeds the next dataset's
    /// pre-fills. Only valid on the commit step.
    pub fn commit(
        &mut self,
        conn: &Connection,
        library: &Library,
    ) -> Result<CommitOutcome, CommitError> {
        if self.step != PipelineStep::Commit {
            return Err(CommitError::NotReady);
        }

        let outcome = commit_dataset(conn, &self.datasets[self.current], &self.mappings)?;

        if self.is_last_dataset() {
            // Mapping state never outlives its dataset.
            self.mappings = MappingTables::default();
            self.step = PipelineStep::Done;
        } else {
            self.current += 1;
            self.load_current(library);
        }
        Ok(outcome)
    }
}
