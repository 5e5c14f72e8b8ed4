//! Small pure helpers shared across crates.

/// Normalize a title or name for matching: trimmed and lowercased.
pub fn normalize_title(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Derive a default display avatar from a name: the uppercased initials
/// of the first two words (e.g., "Alex Barnes" → "AB", "Sam" → "S").
pub fn default_avatar(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|w| w.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Format a minute count as an `h:mm` duration string (e.g., 90 → "1:30").
pub fn format_duration_minutes(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
