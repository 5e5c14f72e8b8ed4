//! Pure entity matchers.
//!
//! Each function proposes a match between one foreign entity and the
//! user's existing catalog. They only pre-select: the mapping state
//! machine still requires the user to confirm every decision. All
//! comparisons run on normalized (trimmed, lowercased) text.
//!
//! The matchers are deliberately asymmetric. Locations default to
//! "create new" on a miss; players and extensions stay unresolved,
//! because creating a duplicate person or merging two different people
//! is a real mistake while a duplicate location is trivially fixed.

use std::collections::BTreeSet;

use matchbook_core::util::normalize_title;
use matchbook_core::{Extension, Game, Player};

/// Match a foreign game title against the library: exact
/// case-insensitive title equality only.
pub fn match_game<'a>(foreign_title: &str, games: &'a [Game]) -> Option<&'a Game> {
    let needle = normalize_title(foreign_title);
    if needle.is_empty() {
        return None;
    }
    games.iter().find(|g| normalize_title(&g.title) == needle)
}

/// Match a foreign extension title against the chosen game's extensions.
///
/// Strategies in order, first hit wins:
/// 1. exact normalized equality;
/// 2. containment (either string contains the other);
/// 3. token overlap — shared tokens longer than 2 chars, highest count
///    wins, first-seen wins ties, zero overlap is no match.
pub fn match_extension<'a>(
    foreign_title: &str,
    candidates: &'a [Extension],
) -> Option<&'a Extension> {
    let needle = normalize_title(foreign_title);
    if needle.is_empty() {
        return None;
    }

    if let Some(hit) = candidates
        .iter()
        .find(|e| normalize_title(&e.title) == needle)
    {
        return Some(hit);
    }

    if let Some(hit) = candidates.iter().find(|e| {
        let title = normalize_title(&e.title);
        !title.is_empty() && (title.contains(&needle) || needle.contains(&title))
    }) {
        return Some(hit);
    }

    let foreign_tokens = tokenize(&needle);
    let mut best: Option<(&Extension, usize)> = None;
    for candidate in candidates {
        let overlap = tokenize(&normalize_title(&candidate.title))
            .intersection(&foreign_tokens)
            .count();
        // Strictly greater: on a tie the first-seen candidate stays.
        if overlap > 0 && best.map_or(true, |(_, b)| overlap > b) {
            best = Some((candidate, overlap));
        }
    }
    best.map(|(e, _)| e)
}

/// Match a foreign location name against known locations: exact
/// normalized equality. Returns the local name verbatim.
pub fn match_location<'a>(foreign_name: &str, locations: &'a [String]) -> Option<&'a str> {
    let needle = normalize_title(foreign_name);
    if needle.is_empty() {
        return None;
    }
    locations
        .iter()
        .find(|l| normalize_title(l) == needle)
        .map(String::as_str)
}

/// Match a foreign player name against the library: exact
/// case-insensitive name equality.
pub fn match_player<'a>(foreign_name: &str, players: &'a [Player]) -> Option<&'a Player> {
    let needle = normalize_title(foreign_name);
    if needle.is_empty() {
        return None;
    }
    players.iter().find(|p| normalize_title(&p.name) == needle)
}

/// Split a normalized title into its distinct tokens longer than 2 chars.
fn tokenize(s: &str) -> BTreeSet<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_and_filters_short_tokens() {
        let tokens = tokenize("the barbarian-attack of 77");
        assert!(tokens.contains("the"));
        assert!(tokens.contains("barbarian"));
        assert!(tokens.contains("attack"));
        assert!(!tokens.contains("of"));
        assert!(!tokens.contains("77"));
    }
}
