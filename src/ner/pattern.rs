use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::EntityRecognizer;
use crate::models::EntitySpan;

/// Two to five capitalized tokens on one line, academic titles and name
/// particles allowed in between: `Präsidentin Dr. Rita Süssmuth`,
/// `Otto Graf Lambsdorff`, `Hermann Otto Solms`, `Karl-Theodor zu Guttenberg`.
static NAME_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    let token = r"(?:(?:Dr|Prof)\.|\p{Lu}[\p{L}'’]*(?:-\p{Lu}[\p{L}'’]*)*)";
    let particle = r"(?:von|van|de|der|zu|vom|den)";
    Regex::new(&format!(r"\b{token}(?: (?:{particle} )*{token}){{1,4}}"))
        .expect("name sequence pattern is valid")
});

/// Offline recognizer that tags capitalized name-like sequences as persons.
///
/// German capitalizes every noun, so this over-tags heavily; the boundary
/// detector's context rules discard everything not followed by a speaker
/// introduction.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternRecognizer;

impl PatternRecognizer {
    pub fn new() -> Self {
        Self
    }

    pub fn spans(&self, text: &str) -> Vec<EntitySpan> {
        NAME_SEQUENCE
            .find_iter(text)
            .map(|m| EntitySpan::person(m.as_str(), m.start(), m.end()))
            .collect()
    }
}

#[async_trait]
impl EntityRecognizer for PatternRecognizer {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        Ok(self.spans(text))
    }
}
