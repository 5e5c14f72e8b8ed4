//! Local id generation.
//!
//! Games and extensions get stable slug-based ids so re-importing the same
//! titles converges on the same rows. Players and matches get random ids —
//! names collide too often for slugs to be safe there.

use uuid::Uuid;

/// Generate a stable game id from its title.
pub fn game_id(title: &str) -> String {
    format!("game:{}", slugify(title))
}

/// Generate a stable extension id from its owning game and title.
pub fn extension_id(game_id: &str, title: &str) -> String {
    format!("{game_id}:{}", slugify(title))
}

/// Mint a fresh random id (players, matches).
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Convert a string to a URL-safe slug: lowercase, alphanumeric + hyphens.
pub fn slugify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_separator = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('-');
            last_was_separator = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Terraforming Mars: Prelude"), "terraforming-mars-prelude");
        assert_eq!(slugify("  7 Wonders!  "), "7-wonders");
    }

    #[test]
    fn game_ids_are_stable() {
        assert_eq!(game_id("Wingspan"), "game:wingspan");
        assert_eq!(
            extension_id("game:wingspan", "European Expansion"),
            "game:wingspan:european-expansion"
        );
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(fresh_id(), fresh_id());
    }
}
