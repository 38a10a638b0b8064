use serde::{Deserialize, Serialize};

/// A contiguous slice of speech attributed to one raw speaker label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSegment {
    /// Speaker name as written in the transcript
    pub raw_speaker_label: String,
    /// Speech text with the introduction artifacts removed
    pub text: String,
    /// Party parenthetical, e.g. `(CDU/CSU)`
    pub party: Option<String>,
    /// Byte offset in the normalized transcript where the segment starts
    pub start: usize,
    /// Where the speech ends, i.e. where the next speaker's name starts
    pub text_end: usize,
    /// Where the next segment starts. `start..end` ranges of consecutive
    /// segments tile the transcript; `text_end..end` is the next speaker's name.
    pub end: usize,
}

/// A segment after roster matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedSegment {
    pub segment: SpeechSegment,
    /// Matched legislator, if any roster name met the cutoff
    pub matched_legislator_id: Option<String>,
    /// Canonical roster name of the match
    pub matched_name: Option<String>,
}

impl ResolvedSegment {
    pub fn is_resolved(&self) -> bool {
        self.matched_legislator_id.is_some()
    }
}

/// All speech of one identity within one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerAggregate {
    /// Legislator id, or the raw label for unresolved speakers
    pub speaker_id: String,
    /// Canonical roster name, or the raw label for unresolved speakers
    pub speaker_name: String,
    pub resolved: bool,
    pub full_text: String,
    /// Whitespace-delimited tokens in the concatenated segment text
    pub word_count: usize,
    pub segment_count: usize,
    /// First party annotation seen for this speaker
    pub party: Option<String>,
}
