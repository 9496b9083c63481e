//! Human-chosen link identifier sanitization.

use deckshare_core::error::AppError;

/// Maximum identifier length after sanitization.
pub const MAX_IDENTIFIER_LEN: usize = 50;

/// Fold a raw identifier into the `[a-z0-9_-]` charset.
///
/// Rules, applied in order: lowercase; each run of whitespace becomes `_`;
/// any other character outside the charset is dropped; repeated `_`
/// collapse into one; leading and trailing `_`/`-` are trimmed; the result
/// is cut to [`MAX_IDENTIFIER_LEN`] characters (and trimmed again).
/// An identifier that is empty after this is rejected.
pub fn sanitize_identifier(raw: &str) -> Result<String, AppError> {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-') {
            continue;
        }
        if pending_space {
            push_underscore(&mut out);
            pending_space = false;
        }
        if ch == '_' {
            push_underscore(&mut out);
        } else {
            out.push(ch);
        }
    }

    let trimmed: String = out
        .trim_matches(|c| c == '_' || c == '-')
        .chars()
        .take(MAX_IDENTIFIER_LEN)
        .collect();
    let trimmed = trimmed.trim_matches(|c| c == '_' || c == '-');

    if trimmed.is_empty() {
        return Err(AppError::validation(
            "Link identifier must contain at least one letter or digit",
        ));
    }
    Ok(trimmed.to_string())
}

fn push_underscore(out: &mut String) {
    if !out.ends_with('_') {
        out.push('_');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_and_punctuation() {
        assert_eq!(sanitize_identifier("My Deck!").unwrap(), "my_deck");
        assert_eq!(sanitize_identifier("  Series A  ").unwrap(), "series_a");
    }

    #[test]
    fn test_keeps_allowed_charset() {
        assert_eq!(sanitize_identifier("q3-2024_final").unwrap(), "q3-2024_final");
    }

    #[test]
    fn test_collapses_underscores() {
        assert_eq!(sanitize_identifier("a   __  b").unwrap(), "a_b");
    }

    #[test]
    fn test_trims_separators() {
        assert_eq!(sanitize_identifier("--hello--").unwrap(), "hello");
        assert_eq!(sanitize_identifier("!deck?").unwrap(), "deck");
    }

    #[test]
    fn test_length_cap() {
        let long = "a".repeat(80);
        assert_eq!(sanitize_identifier(&long).unwrap().len(), MAX_IDENTIFIER_LEN);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(sanitize_identifier("").is_err());
        assert!(sanitize_identifier("!!! ???").is_err());
        assert!(sanitize_identifier("___").is_err());
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(sanitize_identifier("Café Deck").unwrap(), "caf_deck");
    }
}
