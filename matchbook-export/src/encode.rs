//! Native export encoding: build a canonical dataset from library records
//! and render it as plain JSON or as a URL-carried `data=` payload.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use matchbook_core::{Game, PlayedMatch, Player};

use crate::schema::{
    ExportDataset, ExportExtension, ExportMatch, ExportPlayer, ExportResult, EXPORT_TYPE,
    EXPORT_VERSION,
};

/// Build an export dataset for one game's matches.
///
/// Local ids double as the payload's foreign ids; the importing side
/// reconciles them against its own library. Only players that actually
/// appear in a result are included, keeping the dataset invariant.
pub fn build_export(game: &Game, matches: &[PlayedMatch], players: &[Player]) -> ExportDataset {
    let mut used_players: Vec<ExportPlayer> = Vec::new();
    for m in matches {
        for r in &m.results {
            if !used_players.iter().any(|p| p.id == r.player_id) {
                let name = players
                    .iter()
                    .find(|p| p.id == r.player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| r.player_id.clone());
                used_players.push(ExportPlayer {
                    id: r.player_id.clone(),
                    name,
                });
            }
        }
    }

    ExportDataset {
        kind: EXPORT_TYPE.to_string(),
        version: EXPORT_VERSION,
        source_game_title: game.title.clone(),
        matches: matches.iter().map(export_match).collect(),
        players: used_players,
        extensions: game
            .extensions
            .iter()
            .map(|e| ExportExtension {
                id: e.id.clone(),
                title: e.title.clone(),
            })
            .collect(),
    }
}

fn export_match(m: &PlayedMatch) -> ExportMatch {
    ExportMatch {
        id: m.id.clone(),
        game_id: m.game_id.clone(),
        date: m.date.clone(),
        duration: m.duration.clone(),
        location: m.location.clone(),
        results: m
            .results
            .iter()
            .map(|r| ExportResult {
                player_id: r.player_id.clone(),
                score: r.score,
                is_winner: r.is_winner,
                is_starter: r.is_starter,
                score_breakdown: r.score_breakdown.clone(),
                team_id: r.team_id.clone(),
            })
            .collect(),
        extension_ids: m.extension_ids.clone(),
    }
}

/// Encode a dataset as the URL-safe base64 token carried in `data=`.
pub fn encode_share_payload(dataset: &ExportDataset) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(dataset)?;
    Ok(URL_SAFE.encode(json.as_bytes()))
}

/// Build a full share URL: base address plus the percent-encoded payload
/// as a `data=` query value.
pub fn share_url(base: &str, dataset: &ExportDataset) -> Result<String, serde_json::Error> {
    let token = encode_share_payload(dataset)?;
    let sep = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{sep}data={}", urlencoding::encode(&token)))
}
