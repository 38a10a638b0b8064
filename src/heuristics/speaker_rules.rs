use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::BoundaryRule;

/// Space, party parenthetical, colon: `Hans Müller (CDU):`
static PARTY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \(.*\):").expect("party pattern is valid"));

/// Space, constituency, space, party, colon: `Manfred Richter (Bremerhaven) (F.D.P.):`
static CONSTITUENCY_PARTY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" \(.*\) \(.*\):").expect("constituency pattern is valid"));

/// Bare parenthetical inside a party annotation
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(.*\)").expect("parenthetical pattern is valid"));

/// Slice of at most `chars` characters starting at byte offset `from`.
/// Returns an empty slice when `from` is at or past the end of the text.
pub fn char_window(text: &str, from: usize, chars: usize) -> &str {
    let Some(rest) = text.get(from..) else {
        return "";
    };
    let end = rest
        .char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Slice of at most `chars` characters ending at byte offset `to`
pub fn char_window_before(text: &str, to: usize, chars: usize) -> &str {
    let Some(head) = text.get(..to) else {
        return "";
    };
    let start = head
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if chars == 0 { "" } else { &head[start..] }
}

/// Decide whether the name ending at byte offset `end` is a speaker label.
///
/// Each candidate is judged only by what follows it: a colon right after
/// the name, or a party (optionally preceded by a constituency) and a colon
/// within `window_chars` characters.
pub fn classify_speaker_change(text: &str, end: usize, window_chars: usize) -> Option<BoundaryRule> {
    if text[end.min(text.len())..].starts_with(':') {
        return Some(BoundaryRule::Colon);
    }

    let window = char_window(text, end, window_chars);
    if PARTY_PATTERN.find_iter(window).count() == 1 {
        return Some(BoundaryRule::Party);
    }
    if CONSTITUENCY_PARTY_PATTERN.find_iter(window).count() == 1 {
        return Some(BoundaryRule::ConstituencyParty);
    }

    None
}

/// Party annotations (` (SPD):`) within `window_chars` characters after the name
pub fn party_annotation_matches(text: &str, end: usize, window_chars: usize) -> Vec<String> {
    PARTY_PATTERN
        .find_iter(char_window(text, end, window_chars))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The parenthetical part of an annotation: ` (SPD):` becomes `(SPD)`
pub fn party_from_annotation(annotation: &str) -> Option<String> {
    PARENTHETICAL
        .find(annotation)
        .map(|m| m.as_str().to_string())
}
