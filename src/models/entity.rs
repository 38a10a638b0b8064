use serde::{Deserialize, Serialize};

/// Entity class reported by a recognizer. Only persons are used downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    #[serde(alias = "PER")]
    Person,
    #[serde(other)]
    Other,
}

/// A tagged span of the normalized transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Covered text
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    pub label: EntityLabel,
}

impl EntitySpan {
    pub fn person(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            label: EntityLabel::Person,
        }
    }

    pub fn is_person(&self) -> bool {
        self.label == EntityLabel::Person
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_aliases() {
        let label: EntityLabel = serde_json::from_str(r#""PER""#).unwrap();
        assert_eq!(label, EntityLabel::Person);
        let label: EntityLabel = serde_json::from_str(r#""LOC""#).unwrap();
        assert_eq!(label, EntityLabel::Other);
    }
}
