use tracing::debug;

use crate::heuristics::party_from_annotation;
use crate::models::{BoundaryMark, SpeechSegment};

/// Execute Stage 2: segment extraction
///
/// Slices the normalized text between consecutive boundary marks. The
/// speaker's introduction is stripped from the start of each slice: either
/// the captured party annotation (` (SPD):`) or the bare colon that follows
/// the name.
pub fn extract_segments(text: &str, marks: &[BoundaryMark]) -> Vec<SpeechSegment> {
    let segments: Vec<SpeechSegment> = marks
        .iter()
        .enumerate()
        .map(|(i, mark)| {
            let range = mark.segment_range();
            let end = marks
                .get(i + 1)
                .map(|next| next.introduction_end)
                .unwrap_or(text.len());
            let raw = &text[range.clone()];

            let (body, party) = match mark.party_annotation_matches.first() {
                Some(annotation) => (raw.replace(annotation.as_str(), ""), party_from_annotation(annotation)),
                None => (strip_introduction_colon(raw).to_string(), None),
            };

            SpeechSegment {
                raw_speaker_label: mark.speaker_label.clone(),
                text: body.trim().to_string(),
                party,
                start: range.start,
                text_end: range.end,
                end,
            }
        })
        .collect();

    debug!("Extracted {} segments", segments.len());
    segments
}

/// Drop the colon (and a following line break) directly after a speaker name
fn strip_introduction_colon(raw: &str) -> &str {
    raw.strip_prefix(":\n")
        .or_else(|| raw.strip_prefix(':'))
        .unwrap_or(raw)
}
