//! Core domain types for the matchbook session tracker.
//!
//! These types represent the user's local library: games with their
//! extensions, players, locations, and logged matches. Everything here is
//! storage-agnostic — persistence lives in `matchbook-db`.

pub mod id;
pub mod types;
pub mod util;

pub use id::{extension_id, fresh_id, game_id};
pub use types::{Extension, Game, Library, Player, PlayedMatch, PlayedResult};
pub use util::{default_avatar, format_duration_minutes, normalize_title};
