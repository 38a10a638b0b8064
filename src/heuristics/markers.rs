use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// A way of locating a session marker in raw protocol text
#[derive(Debug, Clone)]
pub enum MarkerRule {
    /// Exact text, e.g. `(Schluß der Sitzung:`
    Literal(&'static str),
    /// Regular expression, for markers that carry a time of day
    Pattern(Regex),
}

impl MarkerRule {
    /// Human-readable form for logging
    pub fn describe(&self) -> &str {
        match self {
            MarkerRule::Literal(lit) => lit,
            MarkerRule::Pattern(re) => re.as_str(),
        }
    }

    /// Number of non-overlapping occurrences in `text`
    pub fn count(&self, text: &str) -> usize {
        match self {
            MarkerRule::Literal(lit) => text.match_indices(lit).count(),
            MarkerRule::Pattern(re) => re.find_iter(text).count(),
        }
    }

    /// Byte range of the marker if it occurs exactly once
    pub fn unique_match(&self, text: &str) -> Option<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = match self {
            MarkerRule::Literal(lit) => text
                .match_indices(lit)
                .take(2)
                .map(|(i, m)| i..i + m.len())
                .collect(),
            MarkerRule::Pattern(re) => re.find_iter(text).take(2).map(|m| m.range()).collect(),
        };
        if ranges.len() == 1 { ranges.pop() } else { None }
    }
}

/// Closing markers in priority order. Spelling varies between the old and
/// the reformed orthography and between electoral periods.
pub static END_MARKERS: Lazy<Vec<MarkerRule>> = Lazy::new(|| {
    vec![
        MarkerRule::Literal("(Schluß der Sitzung:"),
        MarkerRule::Literal("(Schluss:"),
        MarkerRule::Literal("(Schluß der"),
        MarkerRule::Literal("(Schluss der"),
        MarkerRule::Literal("(Ende:"),
        MarkerRule::Literal("(Sitzungsende:"),
    ]
});

/// Opening line, e.g. `Beginn: 9.00 Uhr`. The rest of the line is consumed.
pub static START_MARKER: Lazy<MarkerRule> = Lazy::new(|| {
    MarkerRule::Pattern(
        Regex::new(r"\nBeginn: \d{1,2} ?[.:]\d{2}[^\n]*").expect("start marker pattern is valid"),
    )
});

/// Line-initial parenthetical, lazily up to the first closing paren, may span lines
pub static INTERJECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\n\(.*?\)").expect("interjection pattern is valid"));

/// Running page header ending in a page number
pub static PAGE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Deutscher Bundestag .* \d\n").expect("page header pattern is valid")
});

/// Column markers of the two-column print layout
pub const PAGE_MARKERS: [&str; 4] = ["(A)", "(B)", "(C)", "(D)"];

/// First rule, in priority order, that matches exactly once
pub fn first_unique<'a>(
    rules: &'a [MarkerRule],
    text: &str,
) -> Option<(&'a MarkerRule, Range<usize>)> {
    rules
        .iter()
        .find_map(|rule| rule.unique_match(text).map(|range| (rule, range)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_unique_skips_ambiguous_rules() {
        // "(Schluß der" appears twice; the full closing formula is unique
        let text = "Rede (Schluß der Debatte) ... (Schluß der Sitzung: 12.00 Uhr)";
        let (rule, range) = first_unique(&END_MARKERS, text).unwrap();
        assert_eq!(rule.describe(), "(Schluß der Sitzung:");
        assert_eq!(&text[range.start..], "(Schluß der Sitzung: 12.00 Uhr)");
    }

    #[test]
    fn test_first_unique_falls_through_priority() {
        let text = "Danke. (Sitzungsende: 18.03 Uhr)";
        let (rule, _) = first_unique(&END_MARKERS, text).unwrap();
        assert_eq!(rule.describe(), "(Sitzungsende:");
    }

    #[test]
    fn test_no_end_marker() {
        assert!(first_unique(&END_MARKERS, "keine Markierung").is_none());
    }

    #[test]
    fn test_start_marker_variants() {
        for text in [
            "Kopf\nBeginn: 9.00 Uhr\nRede",
            "Kopf\nBeginn: 13:01 Uhr\nRede",
            "Kopf\nBeginn: 9 .00 Uhr\nRede",
        ] {
            let range = START_MARKER.unique_match(text).unwrap();
            assert_eq!(&text[range.end..], "\nRede");
        }
        assert_eq!(START_MARKER.count("Beginn: 9.00 Uhr"), 0);
    }
}
