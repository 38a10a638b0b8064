use serde::{Deserialize, Serialize};

/// Which context rule classified a name as a speaker label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRule {
    /// Name directly followed by a colon
    Colon,
    /// Name, space, party parenthetical, colon
    Party,
    /// Name, space, constituency parenthetical, space, party parenthetical, colon
    ConstituencyParty,
}

/// A person mention judged to open a new speaker's remarks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryMark {
    /// Name as it appears in the transcript
    pub speaker_label: String,
    /// Byte offset where the name starts
    pub start: usize,
    /// Byte offset where the name ends; the speaker's segment begins here
    pub introduction_end: usize,
    /// Start of the next mark's name, or the end of the text for the last mark
    pub next_boundary: usize,
    /// A few characters around the name, for diagnostics
    pub trailing_context: String,
    pub rule: BoundaryRule,
    /// Party annotation matches found right after the name, e.g. ` (CDU):`
    pub party_annotation_matches: Vec<String>,
}

impl BoundaryMark {
    /// Byte range of the speech that belongs to this mark
    pub fn segment_range(&self) -> std::ops::Range<usize> {
        self.introduction_end..self.next_boundary
    }
}
