//! Format classification and foreign-payload conversion.
//!
//! A decoded JSON value is either a native export (the `match_export`
//! marker plus a `matches` array) or a third-party tracker dump: parallel
//! `plays`/`players`/`games` arrays where each play references its game,
//! players, expansions, and location by catalog id. The converter splits
//! such a dump into one canonical dataset per distinct game played.
//!
//! Malformed payloads never error here — they degrade to zero datasets
//! and the caller reports unreadable data.

use chrono::NaiveDate;
use matchbook_core::util::format_duration_minutes;
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{
    ExportDataset, ExportExtension, ExportMatch, ExportPlayer, ExportResult, EXPORT_TYPE,
};

/// Detected datasets plus which indices start out selected for import.
#[derive(Debug, Clone, Default)]
pub struct Detected {
    pub datasets: Vec<ExportDataset>,
    pub preselected: Vec<usize>,
}

impl Detected {
    /// True when nothing importable was found.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Classify a decoded JSON value and produce the datasets it contains.
///
/// Native payloads yield exactly one dataset; foreign payloads yield one
/// per distinct game with at least one play, all preselected.
pub fn detect_datasets(value: &Value) -> Detected {
    if is_native(value) {
        match serde_json::from_value::<ExportDataset>(value.clone()) {
            Ok(dataset) => {
                return Detected {
                    datasets: vec![dataset],
                    preselected: vec![0],
                };
            }
            Err(e) => {
                log::warn!("Native export marker present but payload malformed: {e}");
                return Detected::default();
            }
        }
    }

    convert_foreign(value)
}

/// Check for the native export marker.
fn is_native(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(EXPORT_TYPE)
        && value.get("matches").is_some_and(Value::is_array)
}

// ── Foreign payload shape ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForeignPayload {
    plays: Option<Vec<ForeignPlay>>,
    players: Option<Vec<ForeignPlayer>>,
    games: Option<Vec<ForeignGame>>,
    #[serde(default)]
    locations: Vec<ForeignLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForeignPlay {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    game_ref_id: Option<i64>,
    #[serde(default)]
    player_scores: Vec<ForeignScore>,
    /// Expansion catalog ids this play used.
    #[serde(default)]
    expansion_ref_ids: Vec<i64>,
    #[serde(default)]
    duration_min: Option<f64>,
    #[serde(default)]
    play_date: Option<String>,
    #[serde(default)]
    location_ref_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForeignScore {
    #[serde(default)]
    player_ref_id: Option<i64>,
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    winner: bool,
    #[serde(default)]
    start_player: bool,
}

#[derive(Debug, Deserialize)]
struct ForeignPlayer {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ForeignGame {
    id: i64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForeignLocation {
    id: i64,
    name: String,
}

// ── Conversion ──────────────────────────────────────────────────────────────

/// All foreign ids are namespaced so they can never collide with native
/// ids already in the library.
fn ns_player(id: i64) -> String {
    format!("import-player-{id}")
}

fn ns_game(id: i64) -> String {
    format!("import-game-{id}")
}

fn ns_extension(id: i64) -> String {
    format!("import-ext-{id}")
}

fn ns_play(id: i64) -> String {
    format!("import-play-{id}")
}

/// Convert a foreign tracker dump into one dataset per distinct game.
fn convert_foreign(value: &Value) -> Detected {
    let payload: ForeignPayload = match serde_json::from_value(value.clone()) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Payload is neither native nor a known foreign shape: {e}");
            return Detected::default();
        }
    };

    // All three arrays are required for the foreign shape.
    let (plays, players, games) = match (payload.plays, payload.players, payload.games) {
        (Some(plays), Some(players), Some(games)) => (plays, players, games),
        _ => {
            log::warn!("Foreign payload missing plays/players/games arrays");
            return Detected::default();
        }
    };

    // Group plays by referenced game, preserving first-seen order.
    let mut game_order: Vec<i64> = Vec::new();
    let mut grouped: Vec<(i64, Vec<&ForeignPlay>)> = Vec::new();
    for play in &plays {
        let Some(game_ref) = play.game_ref_id else {
            log::warn!("Skipping play without a game reference");
            continue;
        };
        match game_order.iter().position(|&g| g == game_ref) {
            Some(pos) => grouped[pos].1.push(play),
            None => {
                game_order.push(game_ref);
                grouped.push((game_ref, vec![play]));
            }
        }
    }

    let datasets: Vec<ExportDataset> = grouped
        .iter()
        .map(|(game_ref, group)| convert_game_group(*game_ref, group, &players, &games, &payload.locations))
        .collect();

    let preselected = (0..datasets.len()).collect();
    Detected {
        datasets,
        preselected,
    }
}

/// Build one dataset from all plays of a single foreign game.
fn convert_game_group(
    game_ref: i64,
    plays: &[&ForeignPlay],
    players: &[ForeignPlayer],
    games: &[ForeignGame],
    locations: &[ForeignLocation],
) -> ExportDataset {
    let source_game_title = games
        .iter()
        .find(|g| g.id == game_ref)
        .and_then(|g| g.name.clone())
        .unwrap_or_else(|| "Unknown game".to_string());

    // Every foreign player is a candidate, but only those that actually
    // appear in a play's score list are retained.
    let mut used_players: Vec<ExportPlayer> = Vec::new();
    let mut extensions: Vec<ExportExtension> = Vec::new();
    let mut matches: Vec<ExportMatch> = Vec::new();

    for (i, play) in plays.iter().enumerate() {
        for score in &play.player_scores {
            let Some(pid) = score.player_ref_id else {
                log::warn!("Skipping score entry without a player reference");
                continue;
            };
            let export_id = ns_player(pid);
            if !used_players.iter().any(|p| p.id == export_id) {
                let name = players
                    .iter()
                    .find(|p| p.id == pid)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("Player {pid}"));
                used_players.push(ExportPlayer {
                    id: export_id,
                    name,
                });
            }
        }

        for &ext_ref in &play.expansion_ref_ids {
            let export_id = ns_extension(ext_ref);
            if !extensions.iter().any(|e| e.id == export_id) {
                let title = games
                    .iter()
                    .find(|g| g.id == ext_ref)
                    .and_then(|g| g.name.clone())
                    .unwrap_or_else(|| format!("Expansion {ext_ref}"));
                extensions.push(ExportExtension {
                    id: export_id,
                    title,
                });
            }
        }

        matches.push(convert_play(game_ref, i, play, locations));
    }

    ExportDataset {
        kind: EXPORT_TYPE.to_string(),
        version: crate::schema::EXPORT_VERSION,
        source_game_title,
        matches,
        players: used_players,
        extensions,
    }
}

/// Build one canonical match from a foreign play.
fn convert_play(
    game_ref: i64,
    index: usize,
    play: &ForeignPlay,
    locations: &[ForeignLocation],
) -> ExportMatch {
    let id = play
        .id
        .map(ns_play)
        .unwrap_or_else(|| format!("import-play-x{index}"));

    let duration = play
        .duration_min
        .filter(|&m| m > 0.0)
        .map(|m| format_duration_minutes(m as u32));

    let location = play
        .location_ref_id
        .and_then(|lid| locations.iter().find(|l| l.id == lid))
        .map(|l| l.name.clone());

    let results = play
        .player_scores
        .iter()
        .filter_map(|score| {
            let pid = score.player_ref_id?;
            Some(ExportResult {
                player_id: ns_player(pid),
                score: score.score.as_ref().map(loose_score).unwrap_or(0.0),
                is_winner: score.winner,
                is_starter: score.start_player,
                score_breakdown: None,
                team_id: None,
            })
        })
        .collect();

    ExportMatch {
        id,
        game_id: ns_game(game_ref),
        date: parse_play_date(play.play_date.as_deref()),
        duration,
        location,
        results,
        extension_ids: play.expansion_ref_ids.iter().map(|&e| ns_extension(e)).collect(),
    }
}

/// Read a score value that may be a number or a numeric-looking string.
fn loose_score(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse a foreign play date into `YYYY-MM-DD`, falling back to the raw
/// string when unparseable and to an empty string when absent.
fn parse_play_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let candidates = [
        NaiveDate::parse_from_str(raw, "%Y-%m-%d"),
        NaiveDate::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"),
    ];
    for parsed in candidates {
        if let Ok(date) = parsed {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_dates_normalize_or_fall_through() {
        assert_eq!(parse_play_date(Some("2024-03-01")), "2024-03-01");
        assert_eq!(parse_play_date(Some("2024-03-01T18:30:00+01:00")), "2024-03-01");
        assert_eq!(parse_play_date(Some("first game night")), "first game night");
        assert_eq!(parse_play_date(None), "");
    }

    #[test]
    fn loose_scores_accept_numbers_and_strings() {
        assert_eq!(loose_score(&serde_json::json!(42)), 42.0);
        assert_eq!(loose_score(&serde_json::json!("17.5")), 17.5);
        assert_eq!(loose_score(&serde_json::json!("n/a")), 0.0);
    }
}
