//! Import and entity reconciliation for foreign match payloads.
//!
//! This crate owns the pipeline between a decoded payload and the data
//! store: matching foreign games, extensions, locations, and players
//! against the user's library, walking a fixed sequence of confirmation
//! steps per dataset, and committing a consistent set of created and
//! remapped records exactly once per dataset.

pub mod commit;
pub mod mapping;
pub mod matcher;
pub mod pipeline;

pub use commit::{commit_dataset, log_import, CommitError, CommitOutcome, CommitStats};
pub use mapping::{
    ExtensionDraft, ExtensionMapping, GameDraft, GameMapping, LocationMapping, MappingTables,
    PlayerMapping,
};
pub use matcher::{match_extension, match_game, match_location, match_player};
pub use pipeline::{ImportPipeline, PipelineStep, ValidationError};
