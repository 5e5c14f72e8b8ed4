//! The canonical export schema.
//!
//! This is the shape the native export produces and the import pipeline
//! consumes — one game's worth of matches, players, and extensions, all
//! keyed by ids that are only meaningful inside the payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Marker value of the `type` field on native exports.
pub const EXPORT_TYPE: &str = "match_export";

/// Current schema version of native exports.
pub const EXPORT_VERSION: u32 = 1;

/// One game's importable history.
///
/// Invariant: every `player_id`/`extension_id` referenced inside `matches`
/// appears in `players`/`extensions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDataset {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub source_game_title: String,
    pub matches: Vec<ExportMatch>,
    pub players: Vec<ExportPlayer>,
    #[serde(default)]
    pub extensions: Vec<ExportExtension>,
}

impl ExportDataset {
    /// Distinct non-empty location names referenced by this dataset's
    /// matches, in first-seen order.
    pub fn unique_locations(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for m in &self.matches {
            if let Some(loc) = m.location.as_deref() {
                if !loc.is_empty() && !seen.iter().any(|s| s == loc) {
                    seen.push(loc.to_string());
                }
            }
        }
        seen
    }
}

/// A player entry in an export payload (foreign id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlayer {
    pub id: String,
    pub name: String,
}

/// An extension entry in an export payload (foreign id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportExtension {
    pub id: String,
    pub title: String,
}

/// A match inside an export payload. Ids are foreign and get rewritten
/// at commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMatch {
    pub id: String,
    pub game_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub results: Vec<ExportResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_ids: Vec<String>,
}

/// One player's result within an exported match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub player_id: String,
    /// Accepts a JSON number or a numeric-looking string on input;
    /// always serialized as a number.
    #[serde(default, deserialize_with = "de_score")]
    pub score: f64,
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub is_starter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

/// Deserialize a score that may arrive as a number, a numeric string,
/// or null (treated as zero).
fn de_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match Option::<NumOrStr>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumOrStr::Num(n)) => Ok(n),
        Some(NumOrStr::Str(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("non-numeric score: {s:?}"))),
    }
}
