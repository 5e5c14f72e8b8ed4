//! Payload decoding: raw pasted text, file content, or URL fragments
//! into a candidate JSON value.
//!
//! Strategies are tried in a fixed order and the first one that yields
//! parseable JSON wins, so the same input always decodes the same way:
//! 1. the whole input as plain JSON;
//! 2. the token following a `data=` marker, percent-decoded, as JSON or
//!    as a base64 payload;
//! 3. the whole input as URL-safe base64 wrapping UTF-8 JSON.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;

use crate::error::DecodeError;

/// Decode arbitrary user-supplied text into a JSON value.
///
/// This never mutates any state; failures are surfaced as [`DecodeError`]
/// for the caller to report.
pub fn decode_payload(input: &str) -> Result<Value, DecodeError> {
    let trimmed = input.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(token) = extract_data_token(trimmed) {
        let unescaped = urlencoding::decode(token)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| token.to_string());

        if let Ok(value) = serde_json::from_str(&unescaped) {
            return Ok(value);
        }
        if let Some(value) = base64_json(&unescaped) {
            return Ok(value);
        }
        if let Some(value) = base64_json(token) {
            return Ok(value);
        }
    }

    if let Some(value) = base64_json(trimmed) {
        return Ok(value);
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Err(DecodeError::UnsupportedLink);
    }
    Err(DecodeError::Unreadable)
}

/// Extract the value following a `data=` query marker, stopping at the
/// next separator.
fn extract_data_token(input: &str) -> Option<&str> {
    let start = input.find("data=")? + "data=".len();
    let rest = &input[start..];
    let end = rest
        .find(|c: char| c == '&' || c == '#' || c.is_whitespace())
        .unwrap_or(rest.len());
    let token = &rest[..end];
    (!token.is_empty()).then_some(token)
}

/// Try to read a string as base64-wrapped UTF-8 JSON.
///
/// Accepts both the URL-safe and standard alphabets, padded or not, since
/// payloads arrive from clipboards and query strings that mangle padding.
fn base64_json(input: &str) -> Option<Value> {
    let engines = [URL_SAFE, URL_SAFE_NO_PAD, STANDARD, STANDARD_NO_PAD];

    for engine in &engines {
        if let Ok(bytes) = engine.decode(input) {
            if let Ok(text) = String::from_utf8(bytes) {
                if let Ok(value) = serde_json::from_str(&text) {
                    return Some(value);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_token_stops_at_separators() {
        assert_eq!(
            extract_data_token("https://x.example/import?data=abc123&v=1"),
            Some("abc123")
        );
        assert_eq!(extract_data_token("data=abc#frag"), Some("abc"));
        assert_eq!(extract_data_token("no marker here"), None);
        assert_eq!(extract_data_token("data="), None);
    }
}
