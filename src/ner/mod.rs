pub mod client;
pub mod llm_recognizer;
pub mod pattern;
pub mod prompts;

pub use client::*;
pub use llm_recognizer::*;
pub use pattern::*;
pub use prompts::*;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::EntitySpan;

/// Named-entity recognition over normalized transcript text.
///
/// Implementations are constructed once and shared read-only by every
/// transcript in a batch. Returned spans use byte offsets into `text`.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Tag entity spans in document order
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>>;
}

/// Every whole-word occurrence of the given names as person spans.
///
/// Where occurrences overlap, the earlier one wins, then the longer one.
pub fn locate_names<S: AsRef<str>>(text: &str, names: &[S]) -> Vec<EntitySpan> {
    let mut found: Vec<(usize, usize)> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        for (start, m) in text.match_indices(name) {
            let end = start + m.len();
            if is_word_edge(text, start, end) {
                found.push((start, end));
            }
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut spans: Vec<EntitySpan> = Vec::new();
    let mut last_end = 0usize;
    for (start, end) in found {
        if start < last_end {
            continue;
        }
        spans.push(EntitySpan::person(&text[start..end], start, end));
        last_end = end;
    }
    spans
}

fn is_word_edge(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_names_prefers_longer_overlap() {
        let text = "\nDr. Rita Süssmuth: Danke, Frau Süssmuth.";
        let spans = locate_names(text, &["Süssmuth", "Dr. Rita Süssmuth"]);

        let labels: Vec<_> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(labels, vec!["Dr. Rita Süssmuth", "Süssmuth"]);
        assert!(spans.iter().all(|s| &text[s.start..s.end] == s.text));
    }

    #[test]
    fn test_locate_names_requires_word_edges() {
        let spans = locate_names("Müllers Müller", &["Müller"]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, "Müllers ".len());
    }
}
