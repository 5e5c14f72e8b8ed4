//! SQLite persistence layer for the match library.
//!
//! Provides schema creation, CRUD operations, and query APIs backed by
//! SQLite (via rusqlite with bundled feature). The import pipeline treats
//! this crate as its data store collaborator: every call is an independent
//! atomic insert or lookup.

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    add_extension, insert_game, insert_import_log, insert_match, insert_player,
    register_location, ImportLogEntry, OperationError,
};
pub use queries::{
    find_game_by_title, library_stats, list_games, list_import_logs, list_locations,
    list_players, load_library, matches_for_game, LibraryStats,
};
pub use schema::{open_database, open_memory, SchemaError};

pub use rusqlite::Connection;
