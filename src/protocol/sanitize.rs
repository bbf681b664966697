//! Input sanitization.
//!
//! Every field that reaches a handler from an untrusted channel passes
//! through one of these functions first. None of them reject a frame
//! outright for failing sanitization — a handler either substitutes a
//! safe default (`name`) or treats the field as absent (`sessionId`).

use super::types::{SessionId, SESSION_ID_PREFIX};

/// Fallback name assigned when sanitization leaves nothing usable.
pub const FALLBACK_NAME: &str = "Spieler";

/// Maximum Unicode scalar values kept in a sanitized name.
pub const MAX_NAME_LEN: usize = 50;

/// Trim, strip HTML tags and control characters, and cap the length of
/// a client-supplied display name. Falls back to [`FALLBACK_NAME`] if
/// nothing survives.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.trim().chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            c if is_control(c) => {}
            c => out.push(c),
        }
    }
    let trimmed = out.trim();
    if trimmed.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

fn is_control(c: char) -> bool {
    let code = c as u32;
    (0x00..=0x1F).contains(&code) || code == 0x7F
}

/// Parse a client-supplied session id, treating anything malformed as
/// absent rather than an error. Rejects anything lacking the session id
/// prefix before running the heavier suffix check.
pub fn sanitize_session_id(raw: Option<&str>) -> Option<SessionId> {
    raw.filter(|s| looks_like_session_id(s))
        .and_then(|s| SessionId::parse(s).ok())
}

/// Uppercase, strip whitespace, and bound the length of a client-supplied
/// room code. Does not verify the result exists in the registry.
pub fn sanitize_room_code(raw: &str, expected_len: usize) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .take(expected_len)
        .collect()
}

/// A score is valid only if it is finite and non-negative.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && score >= 0.0
}

/// Cheap format check used before a registry lookup, mirroring the
/// session id's mint format (see [`SessionId::parse`]).
pub fn looks_like_session_id(raw: &str) -> bool {
    raw.starts_with(SESSION_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_tags_and_controls() {
        assert_eq!(sanitize_name("<b>Eve</b>"), "Eve");
        assert_eq!(sanitize_name("Mal\u{0007}ory"), "Malory");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(sanitize_name(""), FALLBACK_NAME);
        assert_eq!(sanitize_name("   "), FALLBACK_NAME);
        assert_eq!(sanitize_name("<script></script>"), FALLBACK_NAME);
    }

    #[test]
    fn caps_name_length() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_name(&long).chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn malformed_session_id_is_treated_as_absent() {
        assert!(sanitize_session_id(Some("garbage")).is_none());
        assert!(sanitize_session_id(None).is_none());
    }

    #[test]
    fn room_code_is_uppercased_and_stripped() {
        assert_eq!(sanitize_room_code(" ab 1 2 ", 4), "AB12");
    }

    #[test]
    fn score_rejects_nan_infinite_and_negative() {
        assert!(!is_valid_score(f64::NAN));
        assert!(!is_valid_score(f64::INFINITY));
        assert!(!is_valid_score(-1.0));
        assert!(is_valid_score(0.0));
        assert!(is_valid_score(42.5));
    }
}
